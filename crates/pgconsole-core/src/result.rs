//! Convenience result type alias for pgconsole.

use crate::error::AppError;

/// A specialized `Result` type for pgconsole operations.
pub type AppResult<T> = Result<T, AppError>;
