//! Session lifecycle: registry plus periodic cleanup.

pub mod cleanup;
pub mod registry;

pub use cleanup::SessionCleanup;
pub use registry::{Session, SessionRegistry};
