//! Session metadata.

use axum::Json;
use chrono::Utc;

use crate::dto::response::{ApiResponse, SessionStatusResponse};
use crate::extractors::CurrentSession;

/// GET /session-status
pub async fn session_status(current: CurrentSession) -> Json<ApiResponse<SessionStatusResponse>> {
    let now = Utc::now();
    Json(ApiResponse::ok(SessionStatusResponse {
        subject: current.subject().to_string(),
        created_at: current.session.created_at,
        last_activity: current.session.last_activity,
        expires_at: current.expires_at(),
        remaining_seconds: current.remaining_seconds_at(now),
    }))
}
