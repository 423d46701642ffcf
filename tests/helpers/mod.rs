//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::header::{ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use tower::ServiceExt;

use pgconsole_api::AppState;
use pgconsole_core::config::AppConfig;

/// Username configured for every test app.
pub const USERNAME: &str = "admin";
/// Password configured for every test app.
pub const PASSWORD: &str = "correct horse battery staple";

/// Points at a port nothing listens on, so any database access fails fast.
const UNREACHABLE_DATABASE_URL: &str = "postgres://pgconsole:pw@127.0.0.1:1/pgconsole";

/// Environment variable naming a disposable test database.
pub const TEST_DATABASE_ENV: &str = "PGCONSOLE_TEST_DATABASE_URL";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Shared state, for inspecting sessions and throttle counters
    pub state: AppState,
}

/// A response with its body read.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    /// Parsed JSON body, `Null` if the body was not JSON
    pub body: Value,
}

impl TestResponse {
    /// `Location` header value.
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").and_then(|v| v.to_str().ok())
    }

    /// First `Set-Cookie` header value.
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of the `Set-Cookie` header, ready for a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }
}

fn config(database_url: &str) -> AppConfig {
    let toml = format!(
        r#"
        [database]
        url = "{database_url}"
        ssl_mode = "disable"
        connect_timeout_seconds = 2

        [auth]
        username = "{USERNAME}"
        password = "{PASSWORD}"
        secret = "integration-test-secret"
        "#
    );
    AppConfig::from_toml_str(&toml).expect("Failed to build test config")
}

impl TestApp {
    /// An app whose database is unreachable. Auth paths never touch it.
    pub fn new() -> Self {
        Self::with_config(config(UNREACHABLE_DATABASE_URL))
    }

    /// An app backed by the database in `PGCONSOLE_TEST_DATABASE_URL`, if set.
    pub fn with_database() -> Option<Self> {
        let url = std::env::var(TEST_DATABASE_ENV).ok()?;
        Some(Self::with_config(config(&url)))
    }

    fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build app state");
        let router = pgconsole_api::build_app(state.clone());
        Self { router, state }
    }

    /// Sends a request as a JSON client.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        let body = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send(req.body(Body::from(body)).expect("Failed to build request"))
            .await
    }

    /// Sends a request as a browser (HTML accepted, no JSON).
    pub async fn browser_get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method("GET")
            .uri(path)
            .header(ACCEPT, "text/html");
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        self.send(req.body(Body::empty()).expect("Failed to build request"))
            .await
    }

    /// Submits the login form. `json` selects a JSON client over a browser.
    pub async fn login_form(
        &self,
        username: &str,
        password: &str,
        next: Option<&str>,
        json: bool,
    ) -> TestResponse {
        self.login_form_with_cookie(username, password, next, json, None)
            .await
    }

    /// [`login_form`](Self::login_form) from a browser that still carries a cookie.
    pub async fn login_form_with_cookie(
        &self,
        username: &str,
        password: &str,
        next: Option<&str>,
        json: bool,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut form = format!(
            "username={}&password={}",
            encode(username),
            encode(password)
        );
        if let Some(next) = next {
            form.push_str(&format!("&next={}", encode(next)));
        }
        let accept = if json { "application/json" } else { "text/html" };
        self.send_raw("POST", "/login", accept, "application/x-www-form-urlencoded", form, cookie)
            .await
    }

    /// Sends `body` verbatim with the given `Accept` and `Content-Type`.
    pub async fn send_raw(
        &self,
        method: &str,
        path: &str,
        accept: &str,
        content_type: &str,
        body: String,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(ACCEPT, accept)
            .header(CONTENT_TYPE, content_type);
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        self.send(req.body(Body::from(body)).expect("Failed to build request"))
            .await
    }

    /// Logs in with the configured credential and returns the cookie pair.
    pub async fn login(&self) -> String {
        let response = self.login_form(USERNAME, PASSWORD, None, true).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);
        response.session_cookie().expect("login did not set a cookie")
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            text,
            body,
        }
    }
}

/// Percent-encodes a form or query value.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
