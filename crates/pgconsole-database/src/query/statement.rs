//! A SQL string paired with its positional parameters.

use serde_json::Value;

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Bound as `TEXT`.
    Text(String),
    /// Bound as `INT8`.
    BigInt(i64),
    /// Bound as `JSONB`; coerced to a column type in SQL.
    Json(Value),
}

/// A parameterized statement ready for the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `$1..$n` placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub params: Vec<Param>,
    /// Command tag reported back to clients (`SELECT`, `INSERT`, ...).
    pub command: &'static str,
}

impl Statement {
    /// Starts an empty statement for `command`.
    pub fn new(command: &'static str) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            command,
        }
    }

    /// Registers a parameter and returns its placeholder.
    pub fn bind(&mut self, param: Param) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }
}
