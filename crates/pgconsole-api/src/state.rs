//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use pgconsole_auth::{CredentialStore, LoginThrottle, SessionRegistry};
use pgconsole_core::AppResult;
use pgconsole_core::config::AppConfig;
use pgconsole_database::DatabaseGateway;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The shared admin credential
    pub credentials: Arc<CredentialStore>,
    /// In-memory sessions
    pub sessions: Arc<SessionRegistry>,
    /// Failed-login counters per client
    pub throttle: Arc<LoginThrottle>,
    /// Per-request database connections
    pub gateway: Arc<DatabaseGateway>,
}

impl AppState {
    /// Builds every component from configuration. Does not touch the network.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let gateway = DatabaseGateway::new(&config.database, config.diagnostics.verbose_errors)?;
        let credentials = CredentialStore::new(&config.auth);
        let sessions = SessionRegistry::from_config(config.auth.secret.clone(), &config.session);
        let throttle = LoginThrottle::from_config(&config.throttle);

        Ok(Self {
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            sessions: Arc::new(sessions),
            throttle: Arc::new(throttle),
            gateway: Arc::new(gateway),
        })
    }
}
