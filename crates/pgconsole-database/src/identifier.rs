//! Table and column name validation.
//!
//! PostgreSQL cannot bind identifiers as parameters, so any name that ends up
//! in SQL text must first pass [`check`]. Values are never validated here;
//! they are always bound.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use pgconsole_core::error::AppError;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Returns `true` iff `identifier` matches `^[A-Za-z_][A-Za-z0-9_]*$`.
pub fn check(identifier: &str) -> bool {
    IDENTIFIER_RE.is_match(identifier)
}

/// A table or column name that passed [`check`].
///
/// The only way to obtain one is [`Identifier::parse`], so holding an
/// `Identifier` proves the name is safe to embed in SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates `name`, returning a validation error on mismatch.
    pub fn parse(name: &str) -> Result<Self, AppError> {
        if check(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(AppError::validation(format!("Invalid identifier: '{name}'")))
        }
    }

    /// Validates a table name.
    pub fn table(name: &str) -> Result<Self, AppError> {
        Self::parse(name).map_err(|_| AppError::validation(format!("Invalid table name: '{name}'")))
    }

    /// Validates a column name.
    pub fn column(name: &str) -> Result<Self, AppError> {
        Self::parse(name)
            .map_err(|_| AppError::validation(format!("Invalid column name: '{name}'")))
    }

    /// The raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name double-quoted for SQL text.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A schema-qualified table reference built from two validated identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedTable {
    /// Schema name.
    pub schema: Identifier,
    /// Table name.
    pub name: Identifier,
}

impl QualifiedTable {
    /// Creates a qualified table reference.
    pub fn new(schema: Identifier, name: Identifier) -> Self {
        Self { schema, name }
    }

    /// `"schema"."table"` for SQL text.
    pub fn quoted(&self) -> String {
        format!("{}.{}", self.schema.quoted(), self.name.quoted())
    }
}

impl fmt::Display for QualifiedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgconsole_core::error::ErrorKind;

    #[test]
    fn test_accepts_plain_names() {
        for name in ["users", "_private", "Order_Items2", "a", "_"] {
            assert!(check(name), "{name} should be accepted");
        }
    }

    #[test]
    fn test_rejects_injection_and_exotic_names() {
        for name in [
            "users; drop table x",
            "",
            "1users",
            "users.name",
            "user-name",
            "\"users\"",
            "users ",
            "naïve",
            "users\n",
            "users--",
        ] {
            assert!(!check(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_returns_validation_error() {
        let err = Identifier::table("users; drop table x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("table"));
    }

    #[test]
    fn test_qualified_table() {
        let table = QualifiedTable::new(
            Identifier::parse("public").unwrap(),
            Identifier::table("user").unwrap(),
        );
        assert_eq!(table.quoted(), "\"public\".\"user\"");
        assert_eq!(table.to_string(), "public.user");
    }

    #[test]
    fn test_quoted() {
        let ident = Identifier::column("createdAt").unwrap();
        assert_eq!(ident.quoted(), "\"createdAt\"");
        assert_eq!(ident.to_string(), "createdAt");
    }
}
