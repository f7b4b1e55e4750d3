//! Role gate: pure authorization predicates over a resolved profile.
//!
//! - No IO
//! - No panics
//! - An absent profile (not authenticated, or not yet loaded) is never authorized

use crate::{ADMIN_ACCESS_ROLES, Capability, Profile, Role, RoleRequirement};

/// True iff the profile's role is a member of `roles`.
///
/// A single [`Role`] is accepted as a one-element set.
pub fn has_role<R: AsRef<[Role]>>(profile: Option<&Profile>, roles: R) -> bool {
    match profile.and_then(|p| p.role) {
        Some(role) => roles.as_ref().contains(&role),
        None => false,
    }
}

pub fn is_admin(profile: Option<&Profile>) -> bool {
    has_role(profile, Role::Admin)
}

/// Admin or staff. Staff get broad administrative capability except where an
/// admin-only check is required explicitly.
pub fn has_admin_access(profile: Option<&Profile>) -> bool {
    has_role(profile, ADMIN_ACCESS_ROLES)
}

pub fn has_permission(profile: Option<&Profile>, capability: Capability) -> bool {
    has_role(profile, capability.roles())
}

/// Evaluate a declarative requirement.
pub fn satisfies(profile: Option<&Profile>, requirement: &RoleRequirement) -> bool {
    match requirement {
        RoleRequirement::Authenticated => profile.is_some(),
        RoleRequirement::Role(role) => has_role(profile, *role),
        RoleRequirement::AnyOf(roles) => has_role(profile, roles),
        RoleRequirement::Capability(cap) => has_permission(profile, *cap),
    }
}
