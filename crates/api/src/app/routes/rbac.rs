//! RBAC audit endpoints for transparent authorization debugging.
//!
//! These endpoints provide visibility into the static role/capability tables
//! and answer "why was this request denied?" for the caller.

use axum::{
    Json, Router,
    extract::{Path, Query, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use studio_auth::{Capability, RoleCatalog, RoleRequirement, SessionError, explain};

use crate::app::{dto, errors};
use crate::context::RequestSession;

/// Catalog routes, mounted under `/admin/rbac`.
pub fn admin_router() -> Router {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles/:name", get(get_role))
        .route("/capabilities", get(list_capabilities))
}

/// Self-service routes, mounted under `/rbac`.
pub fn router() -> Router {
    Router::new().route("/explain", get(explain_for_caller))
}

/// GET /admin/rbac/roles
pub async fn list_roles() -> axum::response::Response {
    let catalog = RoleCatalog::build();
    (StatusCode::OK, Json(serde_json::json!({ "roles": catalog.roles }))).into_response()
}

/// GET /admin/rbac/roles/:name
pub async fn get_role(Path(name): Path<String>) -> axum::response::Response {
    let role = match name.parse() {
        Ok(r) => r,
        Err(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
    };

    match RoleCatalog::build().role(role) {
        Some(def) => (StatusCode::OK, Json(serde_json::json!({ "role": def }))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
    }
}

/// GET /admin/rbac/capabilities
pub async fn list_capabilities() -> axum::response::Response {
    let catalog = RoleCatalog::build();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "capabilities": catalog.capabilities })),
    )
        .into_response()
}

/// GET /rbac/explain?capability=billing.view (or ?role=teacher)
///
/// Open to anonymous callers, whose explanation is simply "unauthenticated".
pub async fn explain_for_caller(
    mut session: RequestSession,
    query: Result<Query<dto::ExplainQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };

    let requirement = match (query.capability.as_deref(), query.role.as_deref()) {
        (Some(raw), None) => match raw.parse::<Capability>() {
            Ok(cap) => RoleRequirement::Capability(cap),
            Err(e) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_capability", e.to_string());
            }
        },
        (None, Some(raw)) => match dto::parse_role(raw) {
            Ok(role) => RoleRequirement::Role(role),
            Err(resp) => return resp,
        },
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "provide exactly one of: capability, role",
            );
        }
    };

    let profile = match session.resolver().load().await {
        Ok(p) => Some(p),
        Err(SessionError::Unauthenticated) => None,
        Err(e) => return errors::guard_error_to_response(e.into()),
    };

    let explanation = explain(profile, &requirement);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "explanation": explanation })),
    )
        .into_response()
}
