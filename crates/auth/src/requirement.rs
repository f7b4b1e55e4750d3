use serde::Serialize;

use crate::{Capability, Role};

/// Declarative policy attached to a route or endpoint.
///
/// Defined statically; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RoleRequirement {
    /// Any authenticated caller with a loaded profile.
    Authenticated,
    /// Exactly this role.
    Role(Role),
    /// At least one of these roles.
    AnyOf(&'static [Role]),
    /// A named capability, resolved through the capability table.
    Capability(Capability),
}

impl RoleRequirement {
    /// Roles accepted by this requirement; `None` means any role (including unrecognized).
    pub fn accepted_roles(&self) -> Option<&[Role]> {
        match self {
            RoleRequirement::Authenticated => None,
            RoleRequirement::Role(role) => Some(role.as_ref()),
            RoleRequirement::AnyOf(roles) => Some(*roles),
            RoleRequirement::Capability(cap) => Some(cap.roles()),
        }
    }

    /// Human-readable form used in denial messages and audit logs.
    pub fn describe(&self) -> String {
        match self {
            RoleRequirement::Authenticated => "an authenticated profile".to_string(),
            RoleRequirement::Role(role) => format!("role '{role}'"),
            RoleRequirement::AnyOf(roles) => describe_roles(roles),
            RoleRequirement::Capability(cap) => format!("capability '{cap}'"),
        }
    }
}

/// "one of roles [a, b]"
pub(crate) fn describe_roles(roles: &[Role]) -> String {
    let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
    format!("one of roles [{}]", names.join(", "))
}

impl From<Role> for RoleRequirement {
    fn from(role: Role) -> Self {
        RoleRequirement::Role(role)
    }
}

impl From<Capability> for RoleRequirement {
    fn from(cap: Capability) -> Self {
        RoleRequirement::Capability(cap)
    }
}

impl core::fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_roles() {
        let req = RoleRequirement::AnyOf(&[Role::Admin, Role::Staff]);
        assert_eq!(req.describe(), "one of roles [admin, staff]");
        assert_eq!(
            RoleRequirement::Capability(Capability::ViewBilling).to_string(),
            "capability 'billing.view'"
        );
    }

    #[test]
    fn capability_requirement_expands_to_table_roles() {
        let req = RoleRequirement::from(Capability::ManageUsers);
        assert_eq!(req.accepted_roles(), Some(&[Role::Admin][..]));
        assert_eq!(RoleRequirement::Authenticated.accepted_roles(), None);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(RoleRequirement::Role(Role::Teacher)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "role", "value": "teacher" }));
    }
}
