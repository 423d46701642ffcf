//! Session cookie gate for every protected route.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::ACCEPT;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use pgconsole_core::error::AppError;

use crate::cookies;
use crate::error::ApiError;
use crate::extractors::AuthenticatedSession;
use crate::state::AppState;

/// Whether the caller wants a structured (JSON) response rather than a page.
pub fn expects_json(headers: &HeaderMap) -> bool {
    let accepts_json = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    accepts_json || is_xhr
}

/// `/login?next=<target>` with the target percent-encoded.
pub fn login_redirect(target: &str) -> String {
    if target.is_empty() || target == "/" {
        return "/login".to_string();
    }
    format!("/login?next={}", utf8_percent_encode(target, NON_ALPHANUMERIC))
}

/// Validates the session cookie and attaches [`AuthenticatedSession`] to the
/// request. Unauthenticated callers get a 401 (JSON) or a redirect to the
/// login page; a stale cookie is cleared either way.
pub async fn auth_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = cookies::session_token(&jar, &state.config);

    if let Some(session) = token.as_deref().and_then(|t| state.sessions.validate(t)) {
        request.extensions_mut().insert(AuthenticatedSession {
            session,
            timeout: state.sessions.timeout(),
        });
        return next.run(request).await;
    }

    let jar = if token.is_some() {
        debug!(path = %request.uri().path(), "Rejected stale session cookie");
        cookies::clear_session(jar, &state.config)
    } else {
        jar
    };

    if expects_json(request.headers()) {
        return (
            jar,
            ApiError(AppError::authentication("Authentication required")),
        )
            .into_response();
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    (jar, Redirect::to(&login_redirect(target))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expects_json() {
        let mut headers = HeaderMap::new();
        assert!(!expects_json(&headers));
        headers.insert(ACCEPT, "text/html,application/xhtml+xml".parse().unwrap());
        assert!(!expects_json(&headers));
        headers.insert(ACCEPT, "application/json".parse().unwrap());
        assert!(expects_json(&headers));

        let mut xhr = HeaderMap::new();
        xhr.insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
        assert!(expects_json(&xhr));
    }

    #[test]
    fn test_login_redirect_encodes_target() {
        assert_eq!(login_redirect("/"), "/login");
        assert_eq!(login_redirect("/tables"), "/login?next=%2Ftables");
        assert_eq!(
            login_redirect("/data/users?page=2"),
            "/login?next=%2Fdata%2Fusers%3Fpage%3D2"
        );
    }
}
