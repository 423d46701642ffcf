//! Periodic cleanup of expired sessions and stale throttle entries.
//!
//! The registry already sweeps on every login; this task bounds staleness by
//! wall-clock time as well.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::throttle::LoginThrottle;

use super::registry::SessionRegistry;

/// Handles periodic cleanup of in-memory auth state.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    registry: Arc<SessionRegistry>,
    throttle: Arc<LoginThrottle>,
    interval: Duration,
}

impl SessionCleanup {
    /// Creates a new cleanup handler.
    pub fn new(
        registry: Arc<SessionRegistry>,
        throttle: Arc<LoginThrottle>,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            throttle,
            interval,
        }
    }

    /// Runs one cleanup cycle. Returns `(sessions_removed, throttle_entries_removed)`.
    pub fn run_cleanup(&self) -> (usize, usize) {
        let sessions = self.registry.sweep();
        let throttled = self.throttle.sweep();
        if sessions > 0 || throttled > 0 {
            info!(
                sessions_removed = sessions,
                throttle_entries_removed = throttled,
                active_sessions = self.registry.len(),
                "Auth state cleanup completed"
            );
        }
        (sessions, throttled)
    }

    /// Spawns the cleanup loop; it exits when `shutdown` flips to `true`.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_cleanup();
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            debug!("Session cleanup task stopping");
                            break;
                        }
                    }
                }
            }
        })
    }
}
