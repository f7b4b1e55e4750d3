use serde::{Deserialize, Serialize};

use studio_core::ProfileId;

use crate::Role;

/// Authorization-relevant record for the owner of a session.
///
/// `role` is `None` when the stored value is outside the [`Role`] enumeration;
/// such a profile satisfies no role requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub role: Option<Role>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Profile {
    pub fn new(id: ProfileId, role: Role) -> Self {
        Self {
            id,
            role: Some(role),
            email: None,
            full_name: None,
        }
    }

    /// Build a profile from a raw row-store role value.
    pub fn from_stored_role(id: ProfileId, raw_role: Option<&str>) -> Self {
        let role = raw_role.and_then(Role::parse_lenient);
        if role.is_none() {
            tracing::warn!(profile_id = %id, raw_role = ?raw_role, "profile has unrecognized role");
        }
        Self {
            id,
            role,
            email: None,
            full_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn role_name(&self) -> &'static str {
        self.role.map(|r| r.as_str()).unwrap_or("unrecognized")
    }
}
