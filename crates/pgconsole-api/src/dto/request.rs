//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Login form body (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Path to return to after logging in.
    pub next: Option<String>,
}

/// `GET /login` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// `GET /data/{table}` query string.
///
/// Numbers are kept as strings so malformed values surface as validation
/// errors with a clear message instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    /// `asc` or `desc`.
    #[serde(alias = "order")]
    pub direction: Option<String>,
}

/// `GET /export/{table}` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    /// `csv` (default) or `json`.
    pub format: Option<String>,
}

/// `POST /run-query` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RunQueryRequest {
    #[serde(default)]
    pub query: String,
}
