//! In-memory session registry.
//!
//! Sessions live only in this process. Restarting the server or running more
//! than one instance loses them; every caller then has to log in again.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use pgconsole_core::config::SessionConfig;

/// Bytes of CSPRNG output per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// A logged-in browser session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// The authenticated username.
    pub subject: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last validated access.
    pub last_activity: DateTime<Utc>,
    /// Cleared when the session is revoked.
    pub valid: bool,
}

impl Session {
    /// Whether the idle time at `now` exceeds `timeout`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_activity > timeout
    }

    fn is_usable_at(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        self.valid && !self.is_expired_at(now, timeout)
    }
}

/// Owns every session; keyed by a secret-salted digest of the token.
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
    secret: String,
    timeout: Duration,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new(secret: impl Into<String>, timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            secret: secret.into(),
            timeout,
        }
    }

    /// Creates a registry from session configuration.
    pub fn from_config(secret: impl Into<String>, config: &SessionConfig) -> Self {
        Self::new(secret, Duration::minutes(config.timeout_minutes as i64))
    }

    /// Idle timeout applied to every session.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of tracked sessions, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Starts a session for `subject` and returns its token.
    pub fn create(&self, subject: &str) -> String {
        self.create_at(subject, Utc::now())
    }

    /// [`create`](Self::create) with an explicit clock.
    pub fn create_at(&self, subject: &str, now: DateTime<Utc>) -> String {
        let token = generate_token();
        self.sessions.insert(
            self.digest(&token),
            Session {
                subject: subject.to_string(),
                created_at: now,
                last_activity: now,
                valid: true,
            },
        );
        self.sweep_at(now);
        token
    }

    /// Returns the session for `token` and refreshes its activity, or `None`
    /// if the token is unknown, revoked, or idle past the timeout.
    pub fn validate(&self, token: &str) -> Option<Session> {
        self.validate_at(token, Utc::now())
    }

    /// [`validate`](Self::validate) with an explicit clock.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let key = self.digest(token);
        let timeout = self.timeout;

        let outcome = {
            let mut entry = self.sessions.get_mut(&key)?;
            if entry.is_usable_at(now, timeout) {
                entry.last_activity = now;
                Some(entry.clone())
            } else {
                None
            }
        };

        if outcome.is_none() {
            let evicted = self
                .sessions
                .remove_if(&key, |_, session| !session.is_usable_at(now, timeout));
            if evicted.is_some() {
                debug!("Evicted stale session");
            }
        }
        outcome
    }

    /// Removes the session for `token`. Unknown tokens are ignored.
    pub fn destroy(&self, token: &str) {
        self.sessions.remove(&self.digest(token));
    }

    /// Marks the session for `token` as revoked; it stays in the map until
    /// the next sweep but can no longer be validated.
    pub fn revoke(&self, token: &str) -> bool {
        match self.sessions.get_mut(&self.digest(token)) {
            Some(mut session) => {
                session.valid = false;
                true
            }
            None => false,
        }
    }

    /// Removes every expired or revoked session. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// [`sweep`](Self::sweep) with an explicit clock.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        let timeout = self.timeout;
        self.sessions
            .retain(|_, session| session.is_usable_at(now, timeout));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "Swept sessions");
        }
        removed
    }

    fn digest(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
