use serde::Serialize;

use studio_core::ProfileId;

use crate::{Capability, Profile, Role, RoleRequirement, gate};

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this request allowed/denied?" without re-deciding: the
/// `granted` flag always comes from [`gate::satisfies`].
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// The requirement being checked, in human-readable form.
    pub requirement: String,

    pub granted: bool,

    pub reason: String,

    /// Roles accepted by the requirement (`None` = any authenticated profile).
    pub accepted_roles: Option<Vec<Role>>,

    pub profile: Option<ProfileState>,

    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileState {
    pub profile_id: ProfileId,
    pub role: Option<Role>,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    UnrecognizedRole,
    MissingRole,
}

pub fn explain(profile: Option<&Profile>, requirement: &RoleRequirement) -> AuthorizationExplanation {
    let granted = gate::satisfies(profile, requirement);
    let accepted_roles = requirement.accepted_roles().map(|roles| roles.to_vec());
    let state = profile.map(|p| ProfileState {
        profile_id: p.id,
        role: p.role,
        capabilities: p.role.map(Capability::granted_to).unwrap_or_default(),
    });

    let (reason, denial_reason) = match profile {
        _ if granted => {
            let reason = match profile.and_then(|p| p.role) {
                Some(role) => format!("Role '{role}' satisfies {requirement}"),
                None => format!("Authenticated profile satisfies {requirement}"),
            };
            (reason, None)
        }
        None => (
            "No authenticated profile".to_string(),
            Some(DenialReason {
                kind: DenialKind::Unauthenticated,
                message: "The request carries no valid session".to_string(),
                suggestions: vec!["Sign in and retry with a valid session token".to_string()],
            }),
        ),
        Some(p) if p.role.is_none() => (
            format!("Profile {} has no recognized role", p.id),
            Some(DenialReason {
                kind: DenialKind::UnrecognizedRole,
                message: "The stored role is outside the studio role set".to_string(),
                suggestions: vec![format!(
                    "Set the profile role to one of: {}",
                    role_list(&Role::ALL)
                )],
            }),
        ),
        Some(p) => {
            let roles = requirement.accepted_roles().unwrap_or_default();
            (
                format!("Role '{}' does not satisfy {requirement}", p.role_name()),
                Some(DenialReason {
                    kind: DenialKind::MissingRole,
                    message: format!("Requires one of: {}", role_list(roles)),
                    suggestions: vec![
                        format!("Ask an administrator to assign one of: {}", role_list(roles)),
                    ],
                }),
            )
        }
    };

    AuthorizationExplanation {
        requirement: requirement.describe(),
        granted,
        reason,
        accepted_roles,
        profile: state,
        denial_reason,
    }
}

fn role_list(roles: &[Role]) -> String {
    roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Role catalog
// ─────────────────────────────────────────────────────────────────────────────

/// Role definition with its granted capabilities (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: Role,
    pub description: &'static str,
    pub capabilities: Vec<Capability>,
}

/// Capability definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityDefinition {
    pub name: Capability,
    pub description: String,
    pub category: &'static str,
    pub roles: Vec<Role>,
}

/// Complete view of the static RBAC tables.
#[derive(Debug, Clone, Serialize)]
pub struct RoleCatalog {
    pub roles: Vec<RoleDefinition>,
    pub capabilities: Vec<CapabilityDefinition>,
}

impl RoleCatalog {
    pub fn build() -> Self {
        let roles = Role::ALL
            .into_iter()
            .map(|role| RoleDefinition {
                name: role,
                description: role_description(role),
                capabilities: Capability::granted_to(role),
            })
            .collect();

        let capabilities = Capability::ALL
            .into_iter()
            .map(|cap| CapabilityDefinition {
                name: cap,
                description: capability_description(cap),
                category: cap.category(),
                roles: cap.roles().to_vec(),
            })
            .collect();

        Self {
            roles,
            capabilities,
        }
    }

    pub fn role(&self, role: Role) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.name == role)
    }
}

fn role_description(role: Role) -> &'static str {
    match role {
        Role::Admin => "Studio owner/administrator with every capability",
        Role::Staff => "Front-desk and office staff with broad administrative access",
        Role::Teacher => "Instructor who runs classes and records attendance",
        Role::Parent => "Guardian managing enrollment, billing and volunteering for dancers",
        Role::Student => "Dancer with access to their own schedule",
    }
}

fn capability_description(cap: Capability) -> String {
    let (area, action) = cap.as_str().split_once('.').unwrap_or((cap.as_str(), ""));

    let action_desc = match action {
        "view" => "View",
        "manage" => "Create/update/delete",
        "record" => "Record",
        "signup" => "Sign up for",
        "send" => "Send",
        other => other,
    };

    format!("{action_desc} {area}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_grant_mentions_role() {
        let teacher = Profile::new(ProfileId::new(), Role::Teacher);
        let e = explain(
            Some(&teacher),
            &RoleRequirement::Capability(Capability::RecordAttendance),
        );
        assert!(e.granted);
        assert!(e.denial_reason.is_none());
        assert_eq!(e.reason, "Role 'teacher' satisfies capability 'attendance.record'");
        assert!(e.profile.unwrap().capabilities.contains(&Capability::ViewClasses));
    }

    #[test]
    fn explain_missing_role_lists_accepted_roles() {
        let parent = Profile::new(ProfileId::new(), Role::Parent);
        let e = explain(Some(&parent), &RoleRequirement::Role(Role::Admin));
        assert!(!e.granted);
        let denial = e.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingRole);
        assert_eq!(denial.message, "Requires one of: admin");
        assert_eq!(e.accepted_roles, Some(vec![Role::Admin]));
    }

    #[test]
    fn explain_without_profile_is_unauthenticated() {
        let e = explain(None, &RoleRequirement::Authenticated);
        assert!(!e.granted);
        assert_eq!(e.denial_reason.unwrap().kind, DenialKind::Unauthenticated);
        assert!(e.accepted_roles.is_none());
    }

    #[test]
    fn explain_unrecognized_role() {
        let p = Profile::from_stored_role(ProfileId::new(), Some("owner"));
        let e = explain(Some(&p), &RoleRequirement::AnyOf(&[Role::Admin, Role::Staff]));
        assert_eq!(e.denial_reason.unwrap().kind, DenialKind::UnrecognizedRole);
    }

    #[test]
    fn catalog_covers_every_role_and_capability() {
        let catalog = RoleCatalog::build();
        assert_eq!(catalog.roles.len(), Role::ALL.len());
        assert_eq!(catalog.capabilities.len(), Capability::ALL.len());

        let admin = catalog.role(Role::Admin).unwrap();
        assert_eq!(admin.capabilities.len(), Capability::ALL.len());

        let billing = catalog
            .capabilities
            .iter()
            .find(|c| c.name == Capability::ViewBilling)
            .unwrap();
        assert_eq!(billing.description, "View billing");
        assert_eq!(billing.category, "billing");
    }
}
