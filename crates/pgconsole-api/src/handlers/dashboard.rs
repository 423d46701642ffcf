//! Dashboard and database metadata.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};

use pgconsole_core::AppResult;
use pgconsole_database::catalog::{self, DatabaseInfo, TableSummary};
use pgconsole_database::{GatewayConnection, Identifier};

use crate::dto::response::{ApiResponse, DashboardResponse};
use crate::error::ApiResult;
use crate::extractors::CurrentSession;
use crate::middleware::auth::expects_json;
use crate::pages;
use crate::state::AppState;

/// GET /
pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentSession,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let schema = state.gateway.schema();
    let mut conn = state.gateway.connect().await?;
    let loaded = load_overview(&mut conn, schema).await;
    conn.close().await;
    let (tables, database) = loaded?;

    if expects_json(&headers) {
        return Ok(Json(ApiResponse::ok(DashboardResponse {
            subject: current.subject().to_string(),
            schema: schema.to_string(),
            tables,
            database,
        }))
        .into_response());
    }

    Ok(Html(pages::dashboard_page(
        current.subject(),
        schema.as_str(),
        &tables,
        &database,
    ))
    .into_response())
}

async fn load_overview(
    conn: &mut GatewayConnection,
    schema: &Identifier,
) -> AppResult<(Vec<TableSummary>, DatabaseInfo)> {
    let tables = catalog::list_tables(conn, schema).await?;
    let info = catalog::database_info(conn).await?;
    Ok((tables, info))
}

/// GET /database-info
pub async fn database_info(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<DatabaseInfo>>> {
    let mut conn = state.gateway.connect().await?;
    let info = catalog::database_info(&mut conn).await;
    conn.close().await;
    Ok(Json(ApiResponse::ok(info?)))
}
