//! Table list and table schema.

use axum::Json;
use axum::extract::{Path, State};

use pgconsole_core::AppResult;
use pgconsole_database::catalog::{self, ColumnInfo, TableSummary};
use pgconsole_database::{GatewayConnection, QualifiedTable, data};

use crate::dto::response::{ApiResponse, SchemaResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /tables
pub async fn list_tables(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<TableSummary>>>> {
    let mut conn = state.gateway.connect().await?;
    let tables = catalog::list_tables(&mut conn, state.gateway.schema()).await;
    conn.close().await;
    Ok(Json(ApiResponse::ok(tables?)))
}

/// GET /schema/{table}
pub async fn table_schema(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> ApiResult<Json<ApiResponse<SchemaResponse>>> {
    let table = state.gateway.table(&table)?;

    let mut conn = state.gateway.connect().await?;
    let loaded = load_schema(&mut conn, &table).await;
    conn.close().await;
    let (columns, primary_key) = loaded?;

    Ok(Json(ApiResponse::ok(SchemaResponse {
        table: table.name.to_string(),
        columns,
        primary_key,
    })))
}

async fn load_schema(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
) -> AppResult<(Vec<ColumnInfo>, Vec<String>)> {
    let columns = data::table_columns(conn, table).await?;
    let primary_key = catalog::primary_key_columns(conn, table).await?;
    Ok((columns, primary_key))
}
