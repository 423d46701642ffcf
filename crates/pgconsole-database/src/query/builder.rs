//! Parameterized statements for row browsing and mutation.
//!
//! Row-returning statements project each row through `row_to_json`, so the
//! gateway receives one text column per row with column order and JSON types
//! intact. Values are bound as JSONB and converted to the target column type
//! with `jsonb_populate_record`, which applies the same input coercion as a
//! typed literal would.

use serde_json::Value;

use pgconsole_core::error::AppError;
use pgconsole_core::types::{PageRequest, SortDirection};

use crate::identifier::{Identifier, QualifiedTable};

use super::statement::{Param, Statement};

/// Alias for the projected row in generated SQL.
const ROW_ALIAS: &str = "pgc_row";

/// Everything needed to build a list query.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    /// Table being browsed.
    pub table: QualifiedTable,
    /// Optional free-text search term.
    pub search: Option<String>,
    /// Text-typed columns the search applies to.
    pub search_columns: Vec<Identifier>,
    /// Optional sort; the column must already be validated.
    pub sort: Option<(Identifier, SortDirection)>,
    /// Requested page.
    pub page: PageRequest,
}

/// The page query and its matching count query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListStatements {
    /// `SELECT ... LIMIT ... OFFSET ...`
    pub rows: Statement,
    /// `SELECT COUNT(*) ...` sharing the same filter.
    pub count: Statement,
}

/// Builds the paginated select and its count.
pub fn list(spec: &QuerySpec) -> ListStatements {
    let table = spec.table.quoted();

    let mut rows = Statement::new("SELECT");
    let mut count = Statement::new("SELECT");

    let filter_rows = search_filter(&mut rows, spec);
    let filter_count = search_filter(&mut count, spec);

    let order = spec
        .sort
        .as_ref()
        .map(|(column, direction)| format!(" ORDER BY {} {}", column.quoted(), direction.as_sql()))
        .unwrap_or_default();

    let limit = rows.bind(Param::BigInt(spec.page.limit() as i64));
    let offset = rows.bind(Param::BigInt(spec.page.offset() as i64));

    rows.sql = format!(
        "SELECT row_to_json({ROW_ALIAS})::text FROM {table} AS {ROW_ALIAS}{filter_rows}{order} LIMIT {limit} OFFSET {offset}"
    );
    count.sql = format!("SELECT COUNT(*) FROM {table} AS {ROW_ALIAS}{filter_count}");

    ListStatements { rows, count }
}

fn search_filter(stmt: &mut Statement, spec: &QuerySpec) -> String {
    let term = match spec.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => term,
        _ => return String::new(),
    };
    if spec.search_columns.is_empty() {
        return String::new();
    }

    let placeholder = stmt.bind(Param::Text(format!("%{term}%")));
    let predicates: Vec<String> = spec
        .search_columns
        .iter()
        .map(|column| format!("{} ILIKE {placeholder}", column.quoted()))
        .collect();
    format!(" WHERE ({})", predicates.join(" OR "))
}

/// Builds an `INSERT ... RETURNING *` for one row.
pub fn insert(table: &QualifiedTable, values: &[(Identifier, Value)]) -> Result<Statement, AppError> {
    if values.is_empty() {
        return Err(AppError::validation(
            "Request body must contain at least one column",
        ));
    }

    let mut stmt = Statement::new("INSERT");
    let columns: Vec<String> = values.iter().map(|(column, _)| column.quoted()).collect();
    let placeholders: Vec<String> = values
        .iter()
        .map(|(column, value)| {
            let placeholder = stmt.bind(Param::Json(value.clone()));
            coerce(table, column, &placeholder)
        })
        .collect();

    stmt.sql = returning_json(&format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        table.quoted(),
        columns.join(", "),
        placeholders.join(", ")
    ));
    Ok(stmt)
}

/// Builds an `UPDATE ... WHERE <pk> = $n RETURNING *` for one row.
///
/// The primary key column is never assigned.
pub fn update(
    table: &QualifiedTable,
    primary_key: &Identifier,
    key_value: &str,
    values: &[(Identifier, Value)],
) -> Result<Statement, AppError> {
    let assignments: Vec<&(Identifier, Value)> = values
        .iter()
        .filter(|(column, _)| column != primary_key)
        .collect();
    if assignments.is_empty() {
        return Err(AppError::validation(
            "Request body must contain at least one non-key column",
        ));
    }

    let mut stmt = Statement::new("UPDATE");
    let sets: Vec<String> = assignments
        .iter()
        .map(|(column, value)| {
            let placeholder = stmt.bind(Param::Json(value.clone()));
            format!("{} = {}", column.quoted(), coerce(table, column, &placeholder))
        })
        .collect();
    let key = stmt.bind(Param::Json(Value::String(key_value.to_string())));

    stmt.sql = returning_json(&format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING *",
        table.quoted(),
        sets.join(", "),
        primary_key.quoted(),
        coerce(table, primary_key, &key)
    ));
    Ok(stmt)
}

/// Builds a `DELETE ... WHERE <pk> = $1 RETURNING *`.
pub fn delete(table: &QualifiedTable, primary_key: &Identifier, key_value: &str) -> Statement {
    let mut stmt = Statement::new("DELETE");
    let key = stmt.bind(Param::Json(Value::String(key_value.to_string())));
    stmt.sql = returning_json(&format!(
        "DELETE FROM {} WHERE {} = {} RETURNING *",
        table.quoted(),
        primary_key.quoted(),
        coerce(table, primary_key, &key)
    ));
    stmt
}

/// Builds the unfiltered select used for exports.
pub fn export(table: &QualifiedTable) -> Statement {
    let mut stmt = Statement::new("SELECT");
    stmt.sql = format!(
        "SELECT row_to_json({ROW_ALIAS})::text FROM {} AS {ROW_ALIAS}",
        table.quoted()
    );
    stmt
}

/// `$n` converted to the declared type of `table.column`.
fn coerce(table: &QualifiedTable, column: &Identifier, placeholder: &str) -> String {
    format!(
        "(jsonb_populate_record(NULL::{}, jsonb_build_object('{}', {placeholder}))).{}",
        table.quoted(),
        column.as_str(),
        column.quoted()
    )
}

fn returning_json(modifying: &str) -> String {
    format!("WITH {ROW_ALIAS} AS ({modifying}) SELECT row_to_json({ROW_ALIAS})::text FROM {ROW_ALIAS}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(name: &str) -> QualifiedTable {
        QualifiedTable::new(
            Identifier::parse("public").unwrap(),
            Identifier::table(name).unwrap(),
        )
    }

    fn col(name: &str) -> Identifier {
        Identifier::column(name).unwrap()
    }

    fn spec() -> QuerySpec {
        QuerySpec {
            table: table("users"),
            search: None,
            search_columns: vec![col("name"), col("email")],
            sort: None,
            page: PageRequest::default(),
        }
    }

    #[test]
    fn test_plain_list() {
        let stmts = list(&spec());
        assert_eq!(
            stmts.rows.sql,
            "SELECT row_to_json(pgc_row)::text FROM \"public\".\"users\" AS pgc_row LIMIT $1 OFFSET $2"
        );
        assert_eq!(stmts.rows.params, vec![Param::BigInt(100), Param::BigInt(0)]);
        assert_eq!(
            stmts.count.sql,
            "SELECT COUNT(*) FROM \"public\".\"users\" AS pgc_row"
        );
        assert!(stmts.count.params.is_empty());
    }

    #[test]
    fn test_third_page_of_ten_offsets_twenty() {
        let mut spec = spec();
        spec.page = PageRequest::new(3, 10).unwrap();
        let stmts = list(&spec);
        assert!(stmts.rows.sql.ends_with("LIMIT $1 OFFSET $2"));
        assert_eq!(stmts.rows.params, vec![Param::BigInt(10), Param::BigInt(20)]);
    }

    #[test]
    fn test_deepest_page_keeps_offset_non_negative() {
        let mut spec = spec();
        spec.page = PageRequest::new(i64::MAX as u64 / 1000 + 1, 1000).unwrap();
        let stmts = list(&spec);
        match stmts.rows.params.last() {
            Some(Param::BigInt(offset)) => assert!(*offset >= 0),
            other => panic!("unexpected offset param: {other:?}"),
        }
    }

    #[test]
    fn test_search_and_sort_share_filter_with_count() {
        let mut spec = spec();
        spec.search = Some(" smith ".to_string());
        spec.sort = Some((col("name"), SortDirection::Desc));
        let stmts = list(&spec);

        assert_eq!(
            stmts.rows.sql,
            "SELECT row_to_json(pgc_row)::text FROM \"public\".\"users\" AS pgc_row \
             WHERE (\"name\" ILIKE $1 OR \"email\" ILIKE $1) ORDER BY \"name\" DESC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            stmts.rows.params,
            vec![
                Param::Text("%smith%".to_string()),
                Param::BigInt(100),
                Param::BigInt(0)
            ]
        );
        assert_eq!(
            stmts.count.sql,
            "SELECT COUNT(*) FROM \"public\".\"users\" AS pgc_row WHERE (\"name\" ILIKE $1 OR \"email\" ILIKE $1)"
        );
        assert_eq!(stmts.count.params, vec![Param::Text("%smith%".to_string())]);
    }

    #[test]
    fn test_search_without_text_columns_is_noop() {
        let mut spec = spec();
        spec.search = Some("smith".to_string());
        spec.search_columns.clear();
        let stmts = list(&spec);
        assert!(!stmts.rows.sql.contains("WHERE"));
        assert!(!stmts.count.sql.contains("WHERE"));
    }

    #[test]
    fn test_search_term_is_bound_not_interpolated() {
        let mut spec = spec();
        spec.search = Some("'; DROP TABLE users; --".to_string());
        let stmts = list(&spec);
        assert!(!stmts.rows.sql.contains("DROP"));
        assert!(!stmts.count.sql.contains("DROP"));
    }

    #[test]
    fn test_insert_binds_one_param_per_value() {
        let stmt = insert(
            &table("users"),
            &[(col("name"), json!("O'Brien")), (col("age"), json!(42))],
        )
        .unwrap();
        assert_eq!(stmt.command, "INSERT");
        assert_eq!(stmt.params, vec![Param::Json(json!("O'Brien")), Param::Json(json!(42))]);
        assert!(stmt.sql.starts_with("WITH pgc_row AS (INSERT INTO \"public\".\"users\" (\"name\", \"age\") VALUES ("));
        assert!(stmt.sql.contains(
            "(jsonb_populate_record(NULL::\"public\".\"users\", jsonb_build_object('age', $2))).\"age\""
        ));
        assert!(stmt.sql.ends_with("RETURNING *) SELECT row_to_json(pgc_row)::text FROM pgc_row"));
        assert!(!stmt.sql.contains("O'Brien"));
    }

    #[test]
    fn test_insert_requires_columns() {
        assert!(insert(&table("users"), &[]).is_err());
    }

    #[test]
    fn test_update_skips_primary_key_and_binds_key_last() {
        let stmt = update(
            &table("users"),
            &col("id"),
            "7",
            &[(col("id"), json!(99)), (col("name"), json!("Ann"))],
        )
        .unwrap();
        assert_eq!(stmt.params, vec![Param::Json(json!("Ann")), Param::Json(json!("7"))]);
        assert!(stmt.sql.contains("SET \"name\" = (jsonb_populate_record"));
        assert!(stmt.sql.contains(
            "WHERE \"id\" = (jsonb_populate_record(NULL::\"public\".\"users\", jsonb_build_object('id', $2))).\"id\""
        ));
        assert!(!stmt.sql.contains("SET \"id\""));
    }

    #[test]
    fn test_update_with_only_key_is_rejected() {
        let err = update(&table("users"), &col("id"), "7", &[(col("id"), json!(1))]).unwrap_err();
        assert_eq!(err.kind, pgconsole_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_delete() {
        let stmt = delete(&table("users"), &col("id"), "7");
        assert_eq!(stmt.command, "DELETE");
        assert_eq!(stmt.params, vec![Param::Json(json!("7"))]);
        assert!(stmt.sql.starts_with("WITH pgc_row AS (DELETE FROM \"public\".\"users\" WHERE \"id\" = "));
        assert!(stmt.sql.contains("RETURNING *)"));
    }

    #[test]
    fn test_export_is_unfiltered() {
        let stmt = export(&table("users"));
        assert_eq!(
            stmt.sql,
            "SELECT row_to_json(pgc_row)::text FROM \"public\".\"users\" AS pgc_row"
        );
        assert!(stmt.params.is_empty());
    }
}
