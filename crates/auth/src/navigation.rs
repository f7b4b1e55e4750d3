//! Navigation guard: decides whether a page navigation proceeds or redirects.
//!
//! The guard is evaluated on every navigation attempt against the caller's
//! [`SessionResolver`]. For a client session the same resolver is reused across
//! navigations, so the profile is fetched once until logout clears it.

use serde::Serialize;

use crate::gate;
use crate::session::{ProfileSource, SessionError, SessionResolver};
use crate::{Capability, Role, RoleRequirement};

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const FALLBACK_LANDING: &str = "/";

/// Authentication-entry routes; authenticated callers are sent to their landing page instead.
pub const AUTH_ENTRY_ROUTES: &[&str] = &["/login", "/register"];

/// Landing destination after login, per role.
pub fn landing_for(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) | Some(Role::Staff) => "/admin/dashboard",
        Some(Role::Teacher) => "/teacher/dashboard",
        Some(Role::Parent) => "/parent/dashboard",
        Some(Role::Student) => "/student/dashboard",
        None => FALLBACK_LANDING,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    pub prefix: &'static str,
    pub requirement: RoleRequirement,
}

const fn rule(prefix: &'static str, requirement: RoleRequirement) -> RouteRule {
    RouteRule {
        prefix,
        requirement,
    }
}

/// Protected page areas of the studio app.
pub const STUDIO_ROUTES: &[RouteRule] = &[
    rule("/admin", RoleRequirement::AnyOf(&[Role::Admin, Role::Staff])),
    rule("/admin/users", RoleRequirement::Role(Role::Admin)),
    rule(
        "/admin/settings",
        RoleRequirement::Capability(Capability::ManageSettings),
    ),
    rule(
        "/admin/billing",
        RoleRequirement::Capability(Capability::ManageBilling),
    ),
    rule(
        "/teacher",
        RoleRequirement::AnyOf(&[Role::Admin, Role::Staff, Role::Teacher]),
    ),
    rule(
        "/parent",
        RoleRequirement::AnyOf(&[Role::Admin, Role::Staff, Role::Parent]),
    ),
    rule(
        "/student",
        RoleRequirement::AnyOf(&[Role::Admin, Role::Staff, Role::Student]),
    ),
    rule(
        "/classes",
        RoleRequirement::AnyOf(&[Role::Admin, Role::Staff, Role::Teacher, Role::Parent]),
    ),
    rule("/dashboard", RoleRequirement::Authenticated),
    rule("/account", RoleRequirement::Authenticated),
];

/// Route → requirement lookup (segment-aware longest prefix).
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(STUDIO_ROUTES.to_vec())
    }
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Requirement for `path`, or `None` for a public route.
    pub fn requirement_for(&self, path: &str) -> Option<&RoleRequirement> {
        let path = route_path(path);
        self.rules
            .iter()
            .filter(|r| matches_prefix(&path, r.prefix))
            .max_by_key(|r| r.prefix.len())
            .map(|r| &r.requirement)
    }
}

/// Canonical path used for matching.
///
/// Query string and fragment are dropped, percent-escapes decoded, case
/// folded, empty and `.` segments removed and `..` resolved, so every
/// spelling a client router would treat as the same page hits the same rule.
fn route_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let raw = &path[..end];
    let decoded = urlencoding::decode(raw).unwrap_or(std::borrow::Cow::Borrowed(raw));

    let mut segments: Vec<String> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_lowercase()),
        }
    }
    format!("/{}", segments.join("/"))
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn is_auth_entry(path: &str) -> bool {
    let path = route_path(path);
    AUTH_ENTRY_ROUTES.iter().any(|entry| *entry == path)
}

/// Login destination preserving the requested path for post-login return.
pub fn login_redirect(requested: &str) -> String {
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(requested))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    Anonymous,
    Authenticated,
    Authenticating,
    Authorized,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavOutcome {
    Proceed,
    Redirect { to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavDecision {
    pub path: String,
    pub state: NavState,
    pub outcome: NavOutcome,
}

impl NavDecision {
    fn proceed(path: &str, state: NavState) -> Self {
        Self {
            path: path.to_string(),
            state,
            outcome: NavOutcome::Proceed,
        }
    }

    fn redirect(path: &str, state: NavState, to: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            state,
            outcome: NavOutcome::Redirect { to: to.into() },
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match &self.outcome {
            NavOutcome::Proceed => None,
            NavOutcome::Redirect { to } => Some(to),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    routes: RouteTable,
}

impl NavigationGuard {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub async fn evaluate<S>(&self, session: &mut SessionResolver<S>, path: &str) -> NavDecision
    where
        S: ProfileSource + ?Sized,
    {
        let initial = if session.is_authenticated() {
            NavState::Authenticated
        } else {
            NavState::Anonymous
        };

        if is_auth_entry(path) {
            if !session.is_authenticated() {
                return NavDecision::proceed(path, initial);
            }
            return match session.load().await {
                Ok(profile) => {
                    NavDecision::redirect(path, NavState::Authorized, landing_for(profile.role))
                }
                // Without a profile the caller cannot be routed; let them see the entry page.
                Err(e) => {
                    tracing::warn!(path, error = %e, "profile unavailable on entry route");
                    NavDecision::proceed(path, initial)
                }
            };
        }

        let Some(requirement) = self.routes.requirement_for(path) else {
            return NavDecision::proceed(path, initial);
        };

        if !session.is_authenticated() {
            tracing::debug!(path, "navigation requires login");
            return NavDecision::redirect(path, NavState::Denied, login_redirect(path));
        }

        // Authenticating: the profile is loaded (or taken from cache) here.
        let profile = match session.load().await {
            Ok(profile) => profile,
            Err(SessionError::ProfileNotFound(id)) => {
                tracing::error!(profile_id = %id, path, "authenticated session has no profile row");
                return NavDecision::redirect(path, NavState::Denied, login_redirect(path));
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "profile load failed during navigation");
                return NavDecision::redirect(path, NavState::Denied, login_redirect(path));
            }
        };

        if gate::satisfies(Some(profile), requirement) {
            NavDecision::proceed(path, NavState::Authorized)
        } else {
            tracing::warn!(
                profile_id = %profile.id,
                role = profile.role_name(),
                path,
                required = %requirement,
                "navigation denied"
            );
            NavDecision::redirect(path, NavState::Denied, UNAUTHORIZED_PATH)
        }
    }
}
