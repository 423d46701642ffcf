//! Database configuration.

use serde::{Deserialize, Serialize};

/// Database connection configuration.
///
/// pgconsole opens one connection per request, so there are no pool knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Schema whose tables are exposed.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// libpq-style SSL mode: `disable`, `allow`, `prefer`, `require`,
    /// `verify-ca`, or `verify-full`.
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    /// Path to a PEM CA certificate used to verify the server.
    #[serde(default)]
    pub ssl_root_cert: Option<String>,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Server-side `statement_timeout` in seconds (0 disables).
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_seconds: u64,
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_statement_timeout() -> u64 {
    30
}
