//! Custom Axum extractors.

pub mod client;
pub mod session;

pub use client::ClientAddr;
pub use session::{AuthenticatedSession, CurrentSession};
