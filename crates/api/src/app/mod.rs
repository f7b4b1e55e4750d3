//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: profile store selection and shared services
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use studio_auth::Hs256TokenValidator;
use studio_infra::ProfileStore;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from process configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let profiles = services::connect_profile_store(config).await?;
    Ok(build_router(&config.jwt_secret, profiles))
}

/// Build the router over an explicit profile store (tests, embedding).
pub fn build_router(jwt_secret: &str, profiles: Arc<dyn ProfileStore>) -> Router {
    let tokens = Arc::new(Hs256TokenValidator::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { tokens };

    let services = Arc::new(services::AppServices::new(profiles));

    routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
        .layer(
            ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)),
        )
}
