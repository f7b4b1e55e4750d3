//! `studio-auth` — role-based access control for the studio app.
//!
//! Session resolution, the role gate, and the two guards built on it
//! (page navigation and API requests). Decoupled from HTTP and storage: the
//! row store is reached only through [`ProfileSource`].

pub mod audit;
pub mod claims;
pub mod gate;
pub mod guard;
pub mod navigation;
pub mod permissions;
pub mod profile;
pub mod requirement;
pub mod roles;
pub mod session;

pub use audit::{AuthorizationExplanation, DenialKind, RoleCatalog, explain};
pub use claims::{Hs256TokenValidator, Identity, SessionClaims, TokenError, TokenValidator, validate_claims};
pub use gate::{has_admin_access, has_permission, has_role, is_admin, satisfies};
pub use guard::{
    GuardError, require, require_admin, require_admin_access, require_auth, require_permission,
    require_role,
};
pub use navigation::{NavDecision, NavOutcome, NavState, NavigationGuard, RouteRule, RouteTable};
pub use permissions::Capability;
pub use profile::Profile;
pub use requirement::RoleRequirement;
pub use roles::{ADMIN_ACCESS_ROLES, Role, UnknownRole};
pub use session::{ProfileSource, ProfileSourceError, SessionError, SessionResolver};
