//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files plus `PGCONSOLE__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{DiagnosticsConfig, ServerConfig};
pub use self::auth::{AuthConfig, ThrottleConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment name (`"development"`, `"production"`, ...).
    #[serde(default = "default_environment")]
    pub environment: String,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Shared credential settings.
    pub auth: AuthConfig,
    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Login throttle settings.
    #[serde(default)]
    pub throttle: ThrottleConfig,
    /// Error diagnostics settings.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, an environment-specific overlay
    /// `config/{env}.toml`, and environment variables prefixed with
    /// `PGCONSOLE` (separator `__`, e.g. `PGCONSOLE__AUTH__PASSWORD`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .set_default("environment", env)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PGCONSOLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an inline TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Whether the deployment runs in production mode (secure cookies).
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Reject configurations that cannot run safely.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.username.trim().is_empty() {
            return Err(AppError::configuration("auth.username must not be empty"));
        }
        if self.auth.password.is_empty() {
            return Err(AppError::configuration("auth.password must not be empty"));
        }
        if self.is_production() && self.auth.uses_placeholder_secret() {
            return Err(AppError::configuration(
                "auth.secret must be set in production",
            ));
        }
        if self.session.timeout_minutes == 0 {
            return Err(AppError::configuration(
                "session.timeout_minutes must be greater than zero",
            ));
        }
        if self.throttle.max_attempts == 0 {
            return Err(AppError::configuration(
                "throttle.max_attempts must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_environment() -> String {
    "development".to_string()
}
