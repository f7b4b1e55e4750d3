use axum::{Json, http::StatusCode, response::IntoResponse};

use studio_auth::{guard, navigation};

use crate::app::{dto, errors};
use crate::context::RequestSession;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /whoami - the caller's profile and post-login landing page
pub async fn whoami(mut session: RequestSession) -> axum::response::Response {
    let profile = match guard::require_auth(session.resolver()).await {
        Ok(p) => p,
        Err(e) => return errors::guard_error_to_response(e),
    };

    Json(serde_json::json!({
        "profile": dto::profile_to_json(&profile),
        "landing": navigation::landing_for(profile.role),
    }))
    .into_response()
}
