//! Row browsing and mutation.
//!
//! Each function takes an open [`GatewayConnection`] and looks up whatever
//! catalog metadata it needs before building its statement.

use serde_json::{Map, Value};
use tracing::{debug, info};

use pgconsole_core::error::AppError;
use pgconsole_core::types::{PageRequest, PageResponse, SortDirection};

use crate::catalog::{self, ColumnInfo};
use crate::connection::GatewayConnection;
use crate::decode::JsonRow;
use crate::identifier::{Identifier, QualifiedTable};
use crate::query::{QuerySpec, builder, export};

/// Browsing parameters for [`list_rows`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub sort: Option<Identifier>,
    pub direction: SortDirection,
    pub page: PageRequest,
}

/// Export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(AppError::validation(format!(
                "Unsupported export format '{other}': expected 'csv' or 'json'"
            ))),
        }
    }
}

/// Parses an optional `sort` query value into a column identifier.
pub fn sort_column(raw: Option<&str>) -> Result<Option<Identifier>, AppError> {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => Identifier::column(name).map(Some),
        _ => Ok(None),
    }
}

/// Validates every key of a JSON request body as a column name.
///
/// Runs before any connection is opened.
pub fn column_values(body: Map<String, Value>) -> Result<Vec<(Identifier, Value)>, AppError> {
    if body.is_empty() {
        return Err(AppError::validation(
            "Request body must contain at least one column",
        ));
    }
    body.into_iter()
        .map(|(name, value)| Ok((Identifier::column(&name)?, value)))
        .collect()
}

/// Columns of `table`, or `NotFound` when the table has none.
pub async fn table_columns(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
) -> Result<Vec<ColumnInfo>, AppError> {
    let columns = catalog::list_columns(conn, table).await?;
    if columns.is_empty() {
        return Err(AppError::not_found(format!("Table '{}' not found", table.name)));
    }
    Ok(columns)
}

/// One page of rows with an optional search and sort.
pub async fn list_rows(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
    options: ListOptions,
) -> Result<PageResponse<JsonRow>, AppError> {
    let columns = table_columns(conn, table).await?;

    if let Some(sort) = &options.sort {
        if !columns.iter().any(|c| c.column_name == sort.as_str()) {
            return Err(AppError::validation(format!(
                "Unknown sort column '{sort}'"
            )));
        }
    }

    let search_columns = columns
        .iter()
        .filter(|c| c.is_text())
        .filter_map(|c| Identifier::column(&c.column_name).ok())
        .collect();

    let spec = QuerySpec {
        table: table.clone(),
        search: options.search,
        search_columns,
        sort: options.sort.map(|column| (column, options.direction)),
        page: options.page,
    };
    let statements = builder::list(&spec);

    let total = conn.fetch_count(&statements.count).await?;
    let rows = conn.fetch_rows(&statements.rows).await?;
    debug!(table = %table, total, returned = rows.len(), "Listed rows");
    Ok(PageResponse::new(rows, &spec.page, total))
}

/// Inserts one row and returns it as stored.
pub async fn insert_row(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
    values: &[(Identifier, Value)],
) -> Result<JsonRow, AppError> {
    let stmt = builder::insert(table, values)?;
    let row = conn
        .fetch_rows(&stmt)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::internal("INSERT returned no row"))?;
    info!(table = %table, "Inserted row");
    Ok(row)
}

/// Updates the row whose primary key equals `key` and returns it.
pub async fn update_row(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
    key: &str,
    values: &[(Identifier, Value)],
) -> Result<JsonRow, AppError> {
    let primary_key = single_primary_key(conn, table).await?;
    let stmt = builder::update(table, &primary_key, key, values)?;
    let row = conn
        .fetch_rows(&stmt)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| row_not_found(table, key))?;
    info!(table = %table, "Updated row");
    Ok(row)
}

/// Deletes the row whose primary key equals `key` and returns it.
pub async fn delete_row(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
    key: &str,
) -> Result<JsonRow, AppError> {
    let primary_key = single_primary_key(conn, table).await?;
    let stmt = builder::delete(table, &primary_key, key);
    let row = conn
        .fetch_rows(&stmt)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| row_not_found(table, key))?;
    info!(table = %table, "Deleted row");
    Ok(row)
}

/// Every row of `table` plus the catalog column order.
pub async fn export_rows(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
) -> Result<(Vec<JsonRow>, Vec<String>), AppError> {
    let columns = table_columns(conn, table)
        .await?
        .into_iter()
        .map(|c| c.column_name)
        .collect();
    let rows = conn.fetch_rows(&builder::export(table)).await?;
    info!(table = %table, rows = rows.len(), "Exported table");
    Ok((rows, columns))
}

/// Renders an export in `format`.
pub fn render_export(
    format: ExportFormat,
    rows: &[JsonRow],
    columns: &[String],
) -> Result<String, AppError> {
    match format {
        ExportFormat::Csv => Ok(export::to_csv(rows, columns)),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

async fn single_primary_key(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
) -> Result<Identifier, AppError> {
    table_columns(conn, table).await?;
    let keys = catalog::primary_key_columns(conn, table).await?;
    match keys.as_slice() {
        [only] => Identifier::column(only),
        [] => Err(AppError::validation(format!(
            "Table '{}' has no primary key; rows cannot be updated or deleted by id",
            table.name
        ))),
        _ => Err(AppError::validation(format!(
            "Table '{}' has a composite primary key; rows cannot be addressed by a single id",
            table.name
        ))),
    }
}

fn row_not_found(table: &QualifiedTable, key: &str) -> AppError {
    AppError::not_found(format!("No row in '{}' with id '{key}'", table.name))
}
