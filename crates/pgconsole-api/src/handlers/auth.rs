//! Login and logout.

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::{info, warn};

use pgconsole_core::error::AppError;

use crate::cookies;
use crate::dto::request::{LoginForm, LoginQuery};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::ClientAddr;
use crate::middleware::auth::expects_json;
use crate::pages;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const UNREADABLE_FORM: &str = "The login form could not be read";
const TOO_MANY_ATTEMPTS: &str = "Too many failed login attempts. Try again later.";

/// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    let next = pages::safe_next(query.next.as_deref());

    let already_logged_in = cookies::session_token(&jar, &state.config)
        .and_then(|token| state.sessions.validate(&token))
        .is_some();
    if already_logged_in {
        return Redirect::to(&next).into_response();
    }

    Html(pages::login_page(&next, None)).into_response()
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    client: ClientAddr,
    jar: CookieJar,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let json = expects_json(&headers);
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) if json => return ApiError::from(rejection).into_response(),
        Err(_) => {
            let page = pages::login_page("/", Some(UNREADABLE_FORM));
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };
    let next = pages::safe_next(form.next.as_deref());
    let client_key = client.as_str();

    if state.throttle.is_blocked(client_key) {
        warn!(client = client_key, "Login refused: client is throttled");
        return failure(json, StatusCode::TOO_MANY_REQUESTS, &next, TOO_MANY_ATTEMPTS);
    }

    if !state.credentials.validate(&form.username, &form.password) {
        let failures = state.throttle.record_failure(client_key);
        warn!(client = client_key, failures, "Login failed");
        return failure(json, StatusCode::UNAUTHORIZED, &next, INVALID_CREDENTIALS);
    }

    state.throttle.clear(client_key);
    if let Some(previous) = cookies::session_token(&jar, &state.config) {
        state.sessions.revoke(&previous);
    }

    let subject = state.credentials.username().to_string();
    let token = state.sessions.create(&subject);
    let jar = cookies::set_session(jar, &state.config, token);
    info!(client = client_key, subject = %subject, "Login succeeded");

    if json {
        let body = LoginResponse {
            subject,
            expires_at: Utc::now() + state.sessions.timeout(),
            redirect: next,
        };
        return (jar, Json(ApiResponse::ok(body))).into_response();
    }
    (jar, Redirect::to(&next)).into_response()
}

fn failure(json: bool, status: StatusCode, next: &str, message: &str) -> Response {
    if json {
        let err = if status == StatusCode::TOO_MANY_REQUESTS {
            AppError::rate_limited(message)
        } else {
            AppError::authentication(message)
        };
        return ApiError(err).into_response();
    }
    (status, Html(pages::login_page(next, Some(message)))).into_response()
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar, headers: HeaderMap) -> Response {
    if let Some(token) = cookies::session_token(&jar, &state.config) {
        state.sessions.destroy(&token);
    }
    let jar = cookies::clear_session(jar, &state.config);
    info!("Logged out");

    if expects_json(&headers) {
        let body = MessageResponse {
            message: "Logged out".to_string(),
        };
        return (jar, Json(ApiResponse::ok(body))).into_response();
    }
    (jar, Redirect::to("/login")).into_response()
}
