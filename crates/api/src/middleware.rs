use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use studio_auth::{Identity, RoleRequirement, TokenValidator, guard};

use crate::app::errors;
use crate::context::{CallerIdentity, RequestSession};

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenValidator>,
}

/// Resolve the session token into a [`CallerIdentity`].
///
/// Never rejects: a missing or invalid token makes the request anonymous, and
/// the guards downstream decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = match extract_bearer(req.headers()) {
        Some(token) => match state.tokens.validate(token, Utc::now()) {
            Ok(claims) => Some(Identity::from(claims)),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid session token");
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CallerIdentity(identity));
    next.run(req).await
}

/// Route layer enforcing a [`RoleRequirement`] before the handler runs.
///
/// On success the loaded profile is attached to the request so the handler's
/// own session starts with it cached.
pub async fn require_middleware(
    State(requirement): State<RoleRequirement>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let mut session = match RequestSession::new(&parts) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match guard::require(session.resolver(), &requirement).await {
        Ok(profile) => {
            parts.extensions.insert(profile);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "route guard rejected request");
            errors::guard_error_to_response(e)
        }
    }
}

/// One span per request; logs the final status and latency.
///
/// Guard denials surface here as 401/403 at `warn` alongside the guard's own
/// audit line.
pub async fn trace_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!("request", %method, %path);
    let started = Instant::now();

    let response = tracing::Instrument::instrument(next.run(req), span.clone()).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    span.in_scope(|| {
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), elapsed_ms, "request failed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), elapsed_ms, "request rejected");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms, "request completed");
        }
    });
    response
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));

        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer   "),
        );
        assert_eq!(extract_bearer(&headers), None);
    }
}
