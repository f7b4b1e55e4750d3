//! Admin routes for profile/role management.
//!
//! The whole `/admin` tree sits behind an admin-or-staff route layer; role
//! changes additionally require the admin role and `users.manage`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use studio_auth::{Capability, Profile, Role, RoleRequirement, guard};
use studio_core::ProfileId;
use studio_infra::ProfileFilter;

use crate::app::{dto, errors, services::AppServices};
use crate::middleware;

pub fn router() -> Router {
    // Role changes are admin-only; the guard runs before the body is read.
    let set_role_route = put(set_role).route_layer(axum::middleware::from_fn_with_state(
        RoleRequirement::Role(Role::Admin),
        middleware::require_middleware,
    ));

    Router::new()
        .route("/profiles", get(list_profiles))
        .route("/profiles/:id/role", set_role_route)
}

/// GET /admin/profiles?role=parent&email=smith&limit=20
pub async fn list_profiles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Profile>,
    query: Result<Query<dto::ListProfilesQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };

    let role = match query.role.as_deref() {
        Some(raw) => match dto::parse_role(raw) {
            Ok(r) => Some(r),
            Err(resp) => return resp,
        },
        None => None,
    };

    let filter = ProfileFilter::new(role, query.email, query.limit);
    let items = match services.profiles.list_profiles(&filter).await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };

    tracing::info!(
        caller = %caller.id,
        count = items.len(),
        "listed profiles"
    );

    let items: Vec<_> = items.iter().map(dto::profile_to_json).collect();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// PUT /admin/profiles/:id/role - assign a role (admin only)
pub async fn set_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Profile>,
    Path(id): Path<String>,
    body: Result<Json<dto::SetRoleRequest>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = guard::require_permission(&caller, Capability::ManageUsers) {
        return errors::guard_error_to_response(e);
    }

    let target: ProfileId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let role = match dto::parse_role(&body.role) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    // An admin demoting themselves could leave the studio without an administrator.
    if target == caller.id {
        return errors::json_error(
            StatusCode::CONFLICT,
            "self_role_change",
            "administrators cannot change their own role",
        );
    }

    match services.profiles.set_role(target, role).await {
        Ok(Some(updated)) => {
            tracing::info!(
                caller = %caller.id,
                profile_id = %target,
                role = %role,
                "profile role changed"
            );
            (StatusCode::OK, Json(dto::profile_to_json(&updated))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "profile not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
