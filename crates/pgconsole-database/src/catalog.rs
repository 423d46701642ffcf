//! Table, column and primary-key metadata from `information_schema`.
//!
//! `information_schema` columns use domain types (`sql_identifier`,
//! `cardinal_number`), so every selected column is cast to a plain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use pgconsole_core::error::AppError;

use crate::connection::GatewayConnection;
use crate::identifier::{Identifier, QualifiedTable};

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub udt_name: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub character_maximum_length: Option<i32>,
    pub ordinal_position: i32,
}

impl ColumnInfo {
    /// Whether the column holds character data and can be searched with `ILIKE`.
    pub fn is_text(&self) -> bool {
        matches!(
            self.data_type.as_str(),
            "text" | "character varying" | "character"
        ) || self.udt_name == "citext"
    }
}

/// A table and how many columns it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TableSummary {
    pub table_name: String,
    pub column_count: i64,
}

/// Server and database metadata.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DatabaseInfo {
    pub version: String,
    pub database: String,
    pub user: String,
    pub size_bytes: i64,
    pub size: String,
    pub started_at: DateTime<Utc>,
    pub encoding: String,
    pub timezone: String,
}

/// Lists base tables in `schema` with their column counts, by name.
pub async fn list_tables(
    conn: &mut GatewayConnection,
    schema: &Identifier,
) -> Result<Vec<TableSummary>, AppError> {
    sqlx::query_as::<_, TableSummary>(
        r#"
        SELECT t.table_name::text AS table_name,
               COUNT(c.column_name) AS column_count
        FROM information_schema.tables t
        LEFT JOIN information_schema.columns c
          ON c.table_schema = t.table_schema AND c.table_name = t.table_name
        WHERE t.table_schema = $1 AND t.table_type = 'BASE TABLE'
        GROUP BY t.table_name
        ORDER BY t.table_name
        "#,
    )
    .bind(schema.as_str())
    .fetch_all(conn.connection())
    .await
    .map_err(|e| conn.map_error(e, "list tables"))
}

/// Columns of `table` in ordinal order. Empty if the table does not exist.
pub async fn list_columns(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
) -> Result<Vec<ColumnInfo>, AppError> {
    sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT column_name::text AS column_name,
               data_type::text AS data_type,
               udt_name::text AS udt_name,
               (is_nullable = 'YES') AS is_nullable,
               column_default::text AS column_default,
               character_maximum_length::int4 AS character_maximum_length,
               ordinal_position::int4 AS ordinal_position
        FROM information_schema.columns
        WHERE table_schema = $1 AND table_name = $2
        ORDER BY ordinal_position
        "#,
    )
    .bind(table.schema.as_str())
    .bind(table.name.as_str())
    .fetch_all(conn.connection())
    .await
    .map_err(|e| conn.map_error(e, "list columns"))
}

/// Primary-key column names of `table`, in key order.
pub async fn primary_key_columns(
    conn: &mut GatewayConnection,
    table: &QualifiedTable,
) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT kcu.column_name::text
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
          ON kcu.constraint_name = tc.constraint_name
         AND kcu.constraint_schema = tc.constraint_schema
         AND kcu.table_name = tc.table_name
        WHERE tc.constraint_type = 'PRIMARY KEY'
          AND tc.table_schema = $1
          AND tc.table_name = $2
        ORDER BY kcu.ordinal_position
        "#,
    )
    .bind(table.schema.as_str())
    .bind(table.name.as_str())
    .fetch_all(conn.connection())
    .await
    .map_err(|e| conn.map_error(e, "primary key lookup"))
}

/// Version, size and session settings of the connected database.
pub async fn database_info(conn: &mut GatewayConnection) -> Result<DatabaseInfo, AppError> {
    sqlx::query_as::<_, DatabaseInfo>(
        r#"
        SELECT version() AS version,
               current_database()::text AS database,
               current_user::text AS user,
               pg_database_size(current_database()) AS size_bytes,
               pg_size_pretty(pg_database_size(current_database())) AS size,
               pg_postmaster_start_time() AS started_at,
               pg_encoding_to_char(d.encoding)::text AS encoding,
               current_setting('TimeZone') AS timezone
        FROM pg_database d
        WHERE d.datname = current_database()
        "#,
    )
    .fetch_one(conn.connection())
    .await
    .map_err(|e| conn.map_error(e, "database info"))
}
