//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pgconsole_database::ExecutionResult;
use pgconsole_database::catalog::{ColumnInfo, DatabaseInfo, TableSummary};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Returned by a successful JSON login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
    /// Where a browser would have been redirected.
    pub redirect: String,
}

/// `GET /session-status`
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusResponse {
    pub subject: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// When the session expires if left idle from now.
    pub expires_at: DateTime<Utc>,
    pub remaining_seconds: i64,
}

/// `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub subject: String,
    pub schema: String,
    pub tables: Vec<TableSummary>,
    pub database: DatabaseInfo,
}

/// `GET /schema/{table}`
#[derive(Debug, Clone, Serialize)]
pub struct SchemaResponse {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    pub primary_key: Vec<String>,
}

/// `POST /run-query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    #[serde(flatten)]
    pub result: ExecutionResult,
    /// Advisory warnings; the query ran regardless.
    pub warnings: Vec<String>,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
