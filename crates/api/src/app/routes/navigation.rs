use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::{dto, errors, services::AppServices};
use crate::context::RequestSession;

/// GET /navigation?path=/admin/dashboard - navigation guard decision for a page
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    mut session: RequestSession,
    query: Result<Query<dto::NavigationQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };

    if !query.path.starts_with('/') {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "path must be absolute (start with '/')",
        );
    }

    let decision = services
        .navigation
        .evaluate(session.resolver(), &query.path)
        .await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "path": decision.path,
            "state": decision.state,
            "outcome": decision.outcome,
            "redirect": decision.redirect_target(),
        })),
    )
        .into_response()
}
