use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Studio role.
///
/// The set is closed: a stored role value outside it is treated as
/// unrecognized by the layers that load profiles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Teacher,
    Parent,
    Student,
}

/// Roles granted broad administrative capability.
pub const ADMIN_ACCESS_ROLES: &[Role] = &[Role::Admin, Role::Staff];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Staff,
        Role::Teacher,
        Role::Parent,
        Role::Student,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
            Role::Student => "student",
        }
    }

    /// Parse a stored role value, mapping anything outside the enumeration to `None`.
    pub fn parse_lenient(raw: &str) -> Option<Role> {
        raw.parse().ok()
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "teacher" => Ok(Role::Teacher),
            "parent" => Ok(Role::Parent),
            "student" => Ok(Role::Student),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// A single role is a one-element role set.
impl AsRef<[Role]> for Role {
    fn as_ref(&self) -> &[Role] {
        core::slice::from_ref(self)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
