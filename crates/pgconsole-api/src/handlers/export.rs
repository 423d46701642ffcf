//! Table export as CSV or JSON.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use pgconsole_database::data::{self, ExportFormat};

use crate::dto::request::ExportQuery;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /export/{table}?format=csv|json
pub async fn export_table(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let table = state.gateway.table(&table)?;
    let format: ExportFormat = query.format.as_deref().unwrap_or("csv").parse()?;

    let mut conn = state.gateway.connect().await?;
    let exported = data::export_rows(&mut conn, &table).await;
    conn.close().await;
    let (rows, columns) = exported?;

    let body = data::render_export(format, &rows, &columns)?;
    let (content_type, extension) = match format {
        ExportFormat::Csv => ("text/csv; charset=utf-8", "csv"),
        ExportFormat::Json => ("application/json", "json"),
    };
    let disposition = format!("attachment; filename=\"{}.{extension}\"", table.name);

    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
