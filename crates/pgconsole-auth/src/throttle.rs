//! Failed-login throttling keyed by client address.
//!
//! This is best-effort abuse mitigation, not a security boundary: client
//! addresses can be shared (NAT) or spoofed (forwarded headers), and the
//! counters live only in this process.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::warn;

use pgconsole_core::config::ThrottleConfig;

/// Failure counter for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThrottleEntry {
    fail_count: u32,
    window_start: DateTime<Utc>,
}

impl ThrottleEntry {
    fn window_expired_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.window_start > window
    }
}

/// Tracks failed logins per client key.
#[derive(Debug)]
pub struct LoginThrottle {
    entries: DashMap<String, ThrottleEntry>,
    max_attempts: u32,
    window: Duration,
}

impl LoginThrottle {
    /// Creates a throttle allowing `max_attempts` failures per `window`.
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// Creates a throttle from configuration.
    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::minutes(config.window_minutes as i64),
        )
    }

    /// Records a failed attempt and returns the failure count in the window.
    pub fn record_failure(&self, client_key: &str) -> u32 {
        self.record_failure_at(client_key, Utc::now())
    }

    /// [`record_failure`](Self::record_failure) with an explicit clock.
    pub fn record_failure_at(&self, client_key: &str, now: DateTime<Utc>) -> u32 {
        let mut entry = self
            .entries
            .entry(client_key.to_string())
            .or_insert(ThrottleEntry {
                fail_count: 0,
                window_start: now,
            });

        if entry.window_expired_at(now, self.window) {
            entry.fail_count = 1;
            entry.window_start = now;
        } else {
            entry.fail_count += 1;
        }

        if entry.fail_count >= self.max_attempts {
            warn!(
                client = client_key,
                failures = entry.fail_count,
                "Client reached the failed login limit"
            );
        }
        entry.fail_count
    }

    /// Whether further attempts from `client_key` must be refused.
    pub fn is_blocked(&self, client_key: &str) -> bool {
        self.is_blocked_at(client_key, Utc::now())
    }

    /// [`is_blocked`](Self::is_blocked) with an explicit clock.
    pub fn is_blocked_at(&self, client_key: &str, now: DateTime<Utc>) -> bool {
        self.entries.get(client_key).is_some_and(|entry| {
            entry.fail_count >= self.max_attempts && !entry.window_expired_at(now, self.window)
        })
    }

    /// Forgets all failures for `client_key` (after a successful login).
    pub fn clear(&self, client_key: &str) {
        self.entries.remove(client_key);
    }

    /// Drops entries whose window has expired. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// [`sweep`](Self::sweep) with an explicit clock.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.window_expired_at(now, self.window));
        before.saturating_sub(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> LoginThrottle {
        LoginThrottle::new(5, Duration::minutes(15))
    }

    fn entry(throttle: &LoginThrottle, client_key: &str) -> Option<ThrottleEntry> {
        throttle.entries.get(client_key).map(|entry| *entry)
    }

    #[test]
    fn test_five_failures_block_sixth_attempt() {
        let throttle = throttle();
        let now = Utc::now();
        for attempt in 1..=4 {
            assert_eq!(throttle.record_failure_at("10.0.0.1", now), attempt);
            assert!(!throttle.is_blocked_at("10.0.0.1", now));
        }
        throttle.record_failure_at("10.0.0.1", now);
        assert!(throttle.is_blocked_at("10.0.0.1", now));
        assert!(!throttle.is_blocked_at("10.0.0.2", now), "scoped per client");
    }

    #[test]
    fn test_clear_resets_counter() {
        let throttle = throttle();
        let now = Utc::now();
        for _ in 0..4 {
            throttle.record_failure_at("10.0.0.1", now);
        }
        throttle.clear("10.0.0.1");
        assert!(entry(&throttle, "10.0.0.1").is_none());
        assert_eq!(throttle.record_failure_at("10.0.0.1", now), 1);
    }

    #[test]
    fn test_block_lifts_after_window() {
        let throttle = throttle();
        let t0 = Utc::now();
        for _ in 0..5 {
            throttle.record_failure_at("10.0.0.1", t0);
        }
        assert!(throttle.is_blocked_at("10.0.0.1", t0 + Duration::minutes(15)));
        assert!(!throttle.is_blocked_at("10.0.0.1", t0 + Duration::minutes(16)));
    }

    #[test]
    fn test_failure_after_window_restarts_count() {
        let throttle = throttle();
        let t0 = Utc::now();
        for _ in 0..3 {
            throttle.record_failure_at("10.0.0.1", t0);
        }
        let later = t0 + Duration::minutes(20);
        assert_eq!(throttle.record_failure_at("10.0.0.1", later), 1);
        let current = entry(&throttle, "10.0.0.1").unwrap();
        assert_eq!(current.window_start, later);
    }

    #[test]
    fn test_sweep_drops_expired_windows() {
        let throttle = throttle();
        let t0 = Utc::now();
        throttle.record_failure_at("old", t0);
        throttle.record_failure_at("new", t0 + Duration::minutes(10));
        assert_eq!(throttle.sweep_at(t0 + Duration::minutes(16)), 1);
        assert!(entry(&throttle, "old").is_none());
        assert!(entry(&throttle, "new").is_some());
    }
}
