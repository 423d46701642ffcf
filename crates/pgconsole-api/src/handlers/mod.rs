//! Route handlers organized by area.

pub mod auth;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod health;
pub mod query;
pub mod session;
pub mod tables;
