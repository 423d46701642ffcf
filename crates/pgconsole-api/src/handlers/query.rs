//! Ad-hoc SQL execution.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{info, warn};

use pgconsole_core::error::AppError;
use pgconsole_database::query::advisory;

use crate::dto::request::RunQueryRequest;
use crate::dto::response::{ApiResponse, QueryResponse};
use crate::error::ApiResult;
use crate::extractors::CurrentSession;
use crate::state::AppState;

/// POST /run-query
///
/// The SQL runs unmodified. Destructive patterns produce warnings in the
/// response but never block execution.
pub async fn run_query(
    State(state): State<AppState>,
    current: CurrentSession,
    req: Result<Json<RunQueryRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<QueryResponse>>> {
    let Json(req) = req?;
    let sql = req.query.trim();
    if sql.is_empty() {
        return Err(AppError::validation("Query must not be empty").into());
    }

    let warnings: Vec<String> = advisory::scan(sql).into_iter().map(String::from).collect();
    if !warnings.is_empty() {
        warn!(subject = current.subject(), ?warnings, "Running query with destructive patterns");
    }

    let mut conn = state.gateway.connect().await?;
    let result = conn.execute_raw(sql).await;
    conn.close().await;
    let result = result?;

    info!(
        subject = current.subject(),
        command = %result.command,
        row_count = result.row_count,
        "Ad-hoc query executed"
    );
    Ok(Json(ApiResponse::ok(QueryResponse { result, warnings })))
}
