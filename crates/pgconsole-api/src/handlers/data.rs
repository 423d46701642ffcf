//! Row browsing and mutation.
//!
//! Identifiers and request bodies are validated before a connection is
//! opened; the connection is closed before the result is turned into a
//! response.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Map, Value};

use pgconsole_core::types::{PageRequest, PageResponse, SortDirection};
use pgconsole_database::JsonRow;
use pgconsole_database::data::{self, ListOptions};

use crate::dto::request::DataQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /data/{table}
pub async fn list_rows(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(query): Query<DataQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<JsonRow>>>> {
    let table = state.gateway.table(&table)?;
    let options = ListOptions {
        search: query.search,
        sort: data::sort_column(query.sort.as_deref())?,
        direction: match query.direction.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<SortDirection>()?,
            _ => SortDirection::default(),
        },
        page: PageRequest::parse(query.page.as_deref(), query.limit.as_deref())?,
    };

    let mut conn = state.gateway.connect().await?;
    let page = data::list_rows(&mut conn, &table, options).await;
    conn.close().await;
    Ok(Json(ApiResponse::ok(page?)))
}

/// POST /data/{table}
pub async fn insert_row(
    State(state): State<AppState>,
    Path(table): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JsonRow>>)> {
    let table = state.gateway.table(&table)?;
    let Json(body) = body?;
    let values = data::column_values(body)?;

    let mut conn = state.gateway.connect().await?;
    let row = data::insert_row(&mut conn, &table, &values).await;
    conn.close().await;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(row?))))
}

/// PUT /data/{table}/{id}
pub async fn update_row(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<JsonRow>>> {
    let table = state.gateway.table(&table)?;
    let Json(body) = body?;
    let values = data::column_values(body)?;

    let mut conn = state.gateway.connect().await?;
    let row = data::update_row(&mut conn, &table, &id, &values).await;
    conn.close().await;
    Ok(Json(ApiResponse::ok(row?)))
}

/// DELETE /data/{table}/{id}
pub async fn delete_row(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<JsonRow>>> {
    let table = state.gateway.table(&table)?;

    let mut conn = state.gateway.connect().await?;
    let row = data::delete_row(&mut conn, &table, &id).await;
    conn.close().await;
    Ok(Json(ApiResponse::ok(row?)))
}
