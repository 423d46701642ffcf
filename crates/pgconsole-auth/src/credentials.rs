//! The single shared admin credential.

use sha2::{Digest, Sha256};

use pgconsole_core::config::AuthConfig;

/// Holds the configured username and a digest of the password.
///
/// Passwords are compared by hashing the candidate to the same fixed-length
/// digest and folding the byte differences, so the comparison time does not
/// depend on where the first mismatch occurs or on the candidate's length.
#[derive(Clone)]
pub struct CredentialStore {
    username: String,
    password_digest: [u8; 32],
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a credential store from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_parts(&config.username, &config.password)
    }

    /// Creates a credential store from an explicit username/password pair.
    pub fn from_parts(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password_digest: digest(password),
        }
    }

    /// Returns `true` iff both username and password match exactly.
    pub fn validate(&self, username: &str, password: &str) -> bool {
        let username_ok = username == self.username;
        let password_ok = constant_time_eq(&digest(password), &self.password_digest);
        username_ok & password_ok
    }

    /// The configured username.
    pub fn username(&self) -> &str {
        &self.username
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_accepted() {
        let store = CredentialStore::from_parts("admin", "s3cret!");
        assert!(store.validate("admin", "s3cret!"));
    }

    #[test]
    fn test_mismatch_rejected() {
        let store = CredentialStore::from_parts("admin", "s3cret!");
        assert!(!store.validate("admin", "s3cret"));
        assert!(!store.validate("admin", "s3cret!!"));
        assert!(!store.validate("Admin", "s3cret!"));
        assert!(!store.validate("", ""));
    }

    #[test]
    fn test_debug_hides_password() {
        let store = CredentialStore::from_parts("admin", "s3cret!");
        let rendered = format!("{store:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_constant_time_eq() {
        let a = digest("abc");
        let b = digest("abd");
        assert!(constant_time_eq(&a, &a));
        assert!(!constant_time_eq(&a, &b));
    }
}
