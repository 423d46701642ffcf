//! The session cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use pgconsole_core::config::AppConfig;

/// The session token carried by `jar`, if any.
pub fn session_token(jar: &CookieJar, config: &AppConfig) -> Option<String> {
    jar.get(&config.session.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Adds the session cookie: HTTP-only, same-site strict, secure in
/// production, max-age equal to the session timeout.
pub fn set_session(jar: CookieJar, config: &AppConfig, token: String) -> CookieJar {
    let cookie = Cookie::build((config.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.is_production())
        .max_age(time::Duration::minutes(config.session.timeout_minutes as i64));
    jar.add(cookie)
}

/// Tells the browser to drop the session cookie.
pub fn clear_session(jar: CookieJar, config: &AppConfig) -> CookieJar {
    jar.remove(Cookie::build((config.session.cookie_name.clone(), "")).path("/"))
}
