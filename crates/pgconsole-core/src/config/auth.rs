//! Credential and login throttle configuration.

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped in defaults; rejected in production.
pub const PLACEHOLDER_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// The single shared credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
    /// Secret mixed into session token digests.
    #[serde(default = "default_secret")]
    pub secret: String,
}

impl AuthConfig {
    /// Whether the secret is still the shipped placeholder.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret.is_empty() || self.secret == PLACEHOLDER_SECRET
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"****")
            .field("secret", &"****")
            .finish()
    }
}

/// Failed-login throttling per client address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Failures allowed inside one window before further attempts are blocked.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Window length in minutes.
    #[serde(default = "default_window")]
    pub window_minutes: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_minutes: default_window(),
        }
    }
}

fn default_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window() -> u64 {
    15
}
