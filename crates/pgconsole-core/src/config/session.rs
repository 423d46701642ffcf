//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout in minutes; also the cookie max-age.
    #[serde(default = "default_timeout")]
    pub timeout_minutes: u64,
    /// Interval for the background sweep of expired sessions, in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: default_timeout(),
            cleanup_interval_minutes: default_cleanup_interval(),
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_cleanup_interval() -> u64 {
    5
}

fn default_cookie_name() -> String {
    "pgconsole_session".to_string()
}
