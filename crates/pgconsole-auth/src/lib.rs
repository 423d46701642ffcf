//! # pgconsole-auth
//!
//! Authentication primitives for the pgconsole admin console.
//!
//! ## Modules
//!
//! - `credentials` - the single shared credential, checked in constant time
//! - `session` - in-memory session registry and its periodic cleanup
//! - `throttle` - per-client failed-login throttling

pub mod credentials;
pub mod session;
pub mod throttle;

pub use credentials::CredentialStore;
pub use session::{Session, SessionCleanup, SessionRegistry};
pub use throttle::LoginThrottle;
