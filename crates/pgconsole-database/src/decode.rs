//! Turning PostgreSQL rows into JSON objects.
//!
//! Builder statements project rows through `row_to_json`, so they arrive as a
//! single JSON text column. Ad-hoc queries run over the simple-query protocol
//! where every value is text; those are converted using the column type name.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

use pgconsole_core::error::AppError;

/// One row keyed by column name, in result column order.
pub type JsonRow = Map<String, Value>;

/// Name and type of a result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    /// Column name as reported by the server.
    pub name: String,
    /// PostgreSQL type name (`INT4`, `TEXT`, ...), when the server reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// Parses one `row_to_json` payload.
pub fn parse_json_row(text: &str) -> Result<JsonRow, AppError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::internal(format!(
            "Expected a JSON object row, got {other}"
        ))),
    }
}

/// Result column descriptions for `row`.
pub fn fields_of(row: &PgRow) -> Vec<FieldInfo> {
    row.columns()
        .iter()
        .map(|column| FieldInfo {
            name: column.name().to_string(),
            data_type: Some(column.type_info().name().to_string()),
        })
        .collect()
}

/// Converts a text-protocol row to JSON.
pub fn decode_text_row(row: &PgRow) -> JsonRow {
    let mut out = Map::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let raw = row
            .try_get_unchecked::<Option<String>, _>(index)
            .ok()
            .flatten();
        let value = match raw {
            Some(text) => coerce_text(column.type_info().name(), text),
            None => Value::Null,
        };
        out.insert(column.name().to_string(), value);
    }
    out
}

/// Converts one text-format value according to its type name.
///
/// Integers, floats, booleans and JSON become native JSON values; everything
/// else (including `NUMERIC`, to keep its precision) stays a string.
pub fn coerce_text(type_name: &str, text: String) -> Value {
    match type_name {
        "BOOL" => match text.as_str() {
            "t" => Value::Bool(true),
            "f" => Value::Bool(false),
            _ => Value::String(text),
        },
        "INT2" | "INT4" | "INT8" | "OID" => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(Value::String(text)),
        "FLOAT4" | "FLOAT8" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(text)),
        "JSON" | "JSONB" => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        _ => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_row_keeps_column_order() {
        let row = parse_json_row(r#"{"zeta":1,"alpha":"a","mid":null}"#).unwrap();
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_json_row_rejects_scalars() {
        assert!(parse_json_row("42").is_err());
        assert!(parse_json_row("not json").is_err());
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text("BOOL", "t".into()), json!(true));
        assert_eq!(coerce_text("INT8", "-12".into()), json!(-12));
        assert_eq!(coerce_text("FLOAT8", "1.5".into()), json!(1.5));
        assert_eq!(coerce_text("FLOAT8", "NaN".into()), json!("NaN"));
        assert_eq!(coerce_text("NUMERIC", "10.00".into()), json!("10.00"));
        assert_eq!(coerce_text("JSONB", r#"{"a":[1]}"#.into()), json!({"a": [1]}));
        assert_eq!(coerce_text("TEXT", "hello".into()), json!("hello"));
        assert_eq!(coerce_text("TIMESTAMPTZ", "2024-01-01 00:00:00+00".into()), json!("2024-01-01 00:00:00+00"));
    }
}
