use axum::{Router, routing::get};

use studio_auth::{ADMIN_ACCESS_ROLES, RoleRequirement};

use crate::middleware;

pub mod admin;
pub mod navigation;
pub mod rbac;
pub mod system;

/// Router for all endpoints. Guards run per route; anonymous callers reach
/// only `/health`, `/navigation` and `/rbac/explain`.
pub fn router() -> Router {
    let admin = admin::router()
        .nest("/rbac", rbac::admin_router())
        .route_layer(axum::middleware::from_fn_with_state(
            RoleRequirement::AnyOf(ADMIN_ACCESS_ROLES),
            middleware::require_middleware,
        ));

    Router::new()
        .route("/health", get(system::health))
        .route("/whoami", get(system::whoami))
        .route("/navigation", get(navigation::check))
        .nest("/rbac", rbac::router())
        .nest("/admin", admin)
}
