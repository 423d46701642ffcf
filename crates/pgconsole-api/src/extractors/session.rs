//! `CurrentSession` extractor: the session the auth gate attached to the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};

use pgconsole_auth::Session;
use pgconsole_core::error::AppError;

use crate::error::ApiError;

/// A validated session plus the idle timeout it was checked against.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub session: Session,
    pub timeout: Duration,
}

impl AuthenticatedSession {
    /// The authenticated username.
    pub fn subject(&self) -> &str {
        &self.session.subject
    }

    /// When the session expires if no further requests arrive.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.session.last_activity + self.timeout
    }

    /// Whole seconds until [`expires_at`](Self::expires_at), never negative.
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at() - now).num_seconds().max(0)
    }
}

/// Extracted session available in handlers behind the auth gate.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AuthenticatedSession);

impl std::ops::Deref for CurrentSession {
    type Target = AuthenticatedSession;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedSession>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| ApiError(AppError::authentication("Authentication required")))
    }
}
