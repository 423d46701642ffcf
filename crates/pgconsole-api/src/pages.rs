//! Minimal server-rendered pages for browser callers.

use pgconsole_database::catalog::{DatabaseInfo, TableSummary};

/// Escapes text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Only same-origin absolute paths are accepted as post-login targets.
/// Control characters are refused since they cannot go in a `Location` header.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control)
                && !path.starts_with("/login") =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// The login form. `error` is shown above the form when present.
pub fn login_page(next: &str, error: Option<&str>) -> String {
    let error_html = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>pgconsole login</title></head>
<body>
<h1>pgconsole</h1>
{error_html}
<form method="post" action="/login">
<input type="hidden" name="next" value="{next}">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit">Log in</button>
</form>
</body>
</html>
"#,
        next = escape_html(next),
    )
}

/// Table list and database stats.
pub fn dashboard_page(
    subject: &str,
    schema: &str,
    tables: &[TableSummary],
    info: &DatabaseInfo,
) -> String {
    let rows: String = tables
        .iter()
        .map(|t| {
            format!(
                r#"<tr><td><a href="/data/{name}">{name}</a></td><td>{count}</td></tr>"#,
                name = escape_html(&t.table_name),
                count = t.column_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>pgconsole</title></head>
<body>
<header>Logged in as {subject} <form method="post" action="/logout"><button type="submit">Log out</button></form></header>
<h1>{database}</h1>
<p>{version}</p>
<p>Size: {size} | Encoding: {encoding} | Time zone: {timezone}</p>
<h2>Tables in {schema}</h2>
<table>
<tr><th>Table</th><th>Columns</th></tr>
{rows}
</table>
</body>
</html>
"#,
        subject = escape_html(subject),
        database = escape_html(&info.database),
        version = escape_html(&info.version),
        size = escape_html(&info.size),
        encoding = escape_html(&info.encoding),
        timezone = escape_html(&info.timezone),
        schema = escape_html(schema),
    )
}
