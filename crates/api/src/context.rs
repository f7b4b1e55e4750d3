use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::Response,
};

use studio_auth::{Identity, Profile, SessionResolver};
use studio_infra::ProfileStore;

use crate::app::{errors, services::AppServices};

/// Identity resolved from the request's session token (`None` = anonymous).
///
/// Inserted by the auth middleware on every request.
#[derive(Debug, Clone, Default)]
pub struct CallerIdentity(pub Option<Identity>);

/// Per-request session resolver backed by the configured profile store.
pub type StudioSession = SessionResolver<dyn ProfileStore>;

/// Extractor giving a handler its own session resolver.
///
/// If a route layer already loaded the profile for this request, the resolver
/// starts with it cached and never fetches again.
pub struct RequestSession(pub StudioSession);

impl RequestSession {
    pub fn new(parts: &Parts) -> Result<Self, Response> {
        let services = parts
            .extensions
            .get::<Arc<AppServices>>()
            .ok_or_else(|| {
                errors::json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "misconfigured",
                    "application services are not installed",
                )
            })?;

        let identity = parts
            .extensions
            .get::<CallerIdentity>()
            .and_then(|c| c.0.clone());
        let loaded = parts.extensions.get::<Profile>().cloned();

        let source = services.profiles.clone();
        let session = match (identity, loaded) {
            (Some(identity), Some(profile)) => {
                SessionResolver::with_loaded(identity, profile, source)
            }
            (identity, _) => SessionResolver::new(identity, source),
        };
        Ok(Self(session))
    }

    pub fn resolver(&mut self) -> &mut StudioSession {
        &mut self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        RequestSession::new(parts)
    }
}
