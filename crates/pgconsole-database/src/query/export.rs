//! CSV serialization of fetched rows.

use serde_json::Value;

use crate::decode::JsonRow;

/// Renders `rows` as CSV.
///
/// The header lists column names in result order, falling back to
/// `fallback_columns` when there are no rows. Every data field is quoted;
/// embedded quotes are doubled and `null` becomes an empty field.
pub fn to_csv(rows: &[JsonRow], fallback_columns: &[String]) -> String {
    let header: Vec<String> = match rows.first() {
        Some(first) => first.keys().cloned().collect(),
        None => fallback_columns.to_vec(),
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header.join(","));
    for row in rows {
        let fields: Vec<String> = header
            .iter()
            .map(|column| quote(&field_text(row.get(column))))
            .collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
