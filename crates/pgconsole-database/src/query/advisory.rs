//! Destructive-pattern warnings for ad-hoc SQL.
//!
//! The scan is advisory. Queries are executed regardless of what it finds.

use std::sync::LazyLock;

use regex::Regex;

static DROP_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdrop\s+table\b").expect("valid regex"));
static DROP_DATABASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdrop\s+database\b").expect("valid regex"));
static DELETE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdelete\s+from\b").expect("valid regex"));
static UPDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bupdate\s+\S+\s+set\b").expect("valid regex"));
static WHERE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwhere\b").expect("valid regex"));

pub const DROP_TABLE_WARNING: &str = "Query contains DROP TABLE";
pub const DROP_DATABASE_WARNING: &str = "Query contains DROP DATABASE";
pub const DELETE_WITHOUT_WHERE_WARNING: &str =
    "DELETE without a WHERE clause affects every row";
pub const UPDATE_WITHOUT_WHERE_WARNING: &str =
    "UPDATE without a WHERE clause affects every row";

/// Returns one warning per destructive pattern found in `sql`.
pub fn scan(sql: &str) -> Vec<&'static str> {
    let mut warnings: Vec<&'static str> = Vec::new();
    let mut push = |warning: &'static str| {
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    };

    for statement in sql.split(';') {
        if DROP_TABLE_RE.is_match(statement) {
            push(DROP_TABLE_WARNING);
        }
        if DROP_DATABASE_RE.is_match(statement) {
            push(DROP_DATABASE_WARNING);
        }
        let has_where = WHERE_RE.is_match(statement);
        if DELETE_RE.is_match(statement) && !has_where {
            push(DELETE_WITHOUT_WHERE_WARNING);
        }
        if UPDATE_RE.is_match(statement) && !has_where {
            push(UPDATE_WITHOUT_WHERE_WARNING);
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_clean() {
        assert!(scan("SELECT * FROM users WHERE id = 1").is_empty());
    }

    #[test]
    fn test_drop_statements() {
        assert_eq!(scan("drop   TABLE users"), vec![DROP_TABLE_WARNING]);
        assert_eq!(scan("DROP DATABASE app"), vec![DROP_DATABASE_WARNING]);
    }

    #[test]
    fn test_delete_and_update_without_where() {
        assert_eq!(scan("DELETE FROM users"), vec![DELETE_WITHOUT_WHERE_WARNING]);
        assert!(scan("DELETE FROM users WHERE id = 3").is_empty());
        assert_eq!(
            scan("update users set active = false"),
            vec![UPDATE_WITHOUT_WHERE_WARNING]
        );
        assert!(scan("UPDATE users SET active = false WHERE id = 1").is_empty());
    }

    #[test]
    fn test_where_in_another_statement_does_not_hide_warning() {
        let warnings = scan("SELECT 1 FROM t WHERE x = 1; DELETE FROM users");
        assert_eq!(warnings, vec![DELETE_WITHOUT_WHERE_WARNING]);
    }

    #[test]
    fn test_warnings_are_deduplicated() {
        let warnings = scan("DROP TABLE a; DROP TABLE b; DELETE FROM c");
        assert_eq!(
            warnings,
            vec![DROP_TABLE_WARNING, DELETE_WITHOUT_WHERE_WARNING]
        );
    }

    #[test]
    fn test_identifiers_containing_keywords_do_not_match() {
        assert!(scan("SELECT dropped_table FROM backdrop_tables").is_empty());
    }
}
