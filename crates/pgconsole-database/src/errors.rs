//! Mapping from driver errors to [`AppError`].
//!
//! Client-facing messages come from a fixed SQLSTATE table. The raw driver
//! message is attached as `detail` only when verbose diagnostics are on.

use tracing::{error, warn};

use pgconsole_core::error::{AppError, ErrorKind};

/// Message used for database faults whose SQLSTATE is not in the table.
pub const GENERIC_DATABASE_MESSAGE: &str = "The database could not complete the request";

/// Message used when the database cannot be reached.
pub const CONNECTIVITY_MESSAGE: &str = "The database is unavailable";

/// User-facing message for a PostgreSQL SQLSTATE code.
pub fn describe_sqlstate(code: &str) -> Option<&'static str> {
    let message = match code {
        "23505" => "A row with the same unique value already exists",
        "23503" => "The change violates a foreign key constraint",
        "23502" => "A required column was left empty",
        "23514" => "The change violates a check constraint",
        "22P02" => "A value has an invalid format for its column type",
        "22001" => "A value is too long for its column",
        "42P01" => "The table does not exist",
        "42703" => "A column does not exist",
        "42601" => "The SQL has a syntax error",
        "42501" => "Insufficient privilege for this operation",
        "57014" => "The statement was cancelled or timed out",
        "28P01" => "The database rejected the configured credentials",
        "3D000" => "The configured database does not exist",
        _ => return None,
    };
    Some(message)
}

/// Classifies `err`. `context` names the operation for the log line.
pub fn map_sqlx_error(err: sqlx::Error, context: &str, verbose: bool) -> AppError {
    match err {
        sqlx::Error::Database(ref db) => {
            let code = db.code().map(|c| c.into_owned()).unwrap_or_default();
            let raw = db.message().to_string();
            warn!(context, sqlstate = %code, "Database rejected statement");

            let kind = if code == "28P01" || code == "3D000" {
                ErrorKind::Connectivity
            } else {
                ErrorKind::Database
            };
            let message = describe_sqlstate(&code).unwrap_or(GENERIC_DATABASE_MESSAGE);
            let mapped = AppError::with_source(kind, message, err);
            if verbose {
                mapped.with_detail(format!("{raw} (SQLSTATE {code})"))
            } else {
                mapped
            }
        }
        sqlx::Error::RowNotFound => AppError::not_found("No matching row"),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => connectivity_error(err, context, verbose),
        sqlx::Error::Configuration(_) => {
            error!(context, error = %err, "Invalid database configuration");
            let detail = err.to_string();
            let mapped = AppError::with_source(
                ErrorKind::Configuration,
                "The database connection is misconfigured",
                err,
            );
            if verbose { mapped.with_detail(detail) } else { mapped }
        }
        other => {
            error!(context, error = %other, "Database driver error");
            let detail = other.to_string();
            let mapped = AppError::with_source(ErrorKind::Database, GENERIC_DATABASE_MESSAGE, other);
            if verbose { mapped.with_detail(detail) } else { mapped }
        }
    }
}

/// Maps a failure to open a connection. Always [`ErrorKind::Connectivity`]
/// unless the server answered with a SQLSTATE.
pub fn map_connect_error(err: sqlx::Error, verbose: bool) -> AppError {
    match err {
        sqlx::Error::Database(_) => map_sqlx_error(err, "connect", verbose),
        other => connectivity_error(other, "connect", verbose),
    }
}

fn connectivity_error(err: sqlx::Error, context: &str, verbose: bool) -> AppError {
    error!(context, error = %err, "Database unreachable");
    let detail = err.to_string();
    let mapped = AppError::with_source(ErrorKind::Connectivity, CONNECTIVITY_MESSAGE, err);
    if verbose { mapped.with_detail(detail) } else { mapped }
}
