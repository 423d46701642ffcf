//! # pgconsole-api
//!
//! HTTP layer for pgconsole built on Axum.
//!
//! Provides the login flow, the cookie-based auth gate, the table browsing
//! and query endpoints, request logging, and error mapping.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
