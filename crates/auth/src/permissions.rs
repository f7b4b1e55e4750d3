use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Named studio capability.
///
/// Capabilities are resolved to role sets through a static table
/// ([`Capability::roles`]); tokens and profiles never carry them directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "users.manage")]
    ManageUsers,
    #[serde(rename = "settings.manage")]
    ManageSettings,
    #[serde(rename = "billing.manage")]
    ManageBilling,
    #[serde(rename = "billing.view")]
    ViewBilling,
    #[serde(rename = "classes.manage")]
    ManageClasses,
    #[serde(rename = "classes.view")]
    ViewClasses,
    #[serde(rename = "attendance.record")]
    RecordAttendance,
    #[serde(rename = "recitals.manage")]
    ManageRecitals,
    #[serde(rename = "costumes.manage")]
    ManageCostumes,
    #[serde(rename = "volunteers.manage")]
    ManageVolunteers,
    #[serde(rename = "volunteers.signup")]
    VolunteerSignup,
    #[serde(rename = "newsletters.send")]
    SendNewsletters,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown capability '{0}'")]
pub struct UnknownCapability(pub String);

const ADMIN: &[Role] = &[Role::Admin];
const ADMIN_STAFF: &[Role] = &[Role::Admin, Role::Staff];
const BILLING_READERS: &[Role] = &[Role::Admin, Role::Staff, Role::Parent];
const INSTRUCTORS: &[Role] = &[Role::Admin, Role::Staff, Role::Teacher];
const EVERYONE: &[Role] = &[
    Role::Admin,
    Role::Staff,
    Role::Teacher,
    Role::Parent,
    Role::Student,
];

impl Capability {
    pub const ALL: [Capability; 12] = [
        Capability::ManageUsers,
        Capability::ManageSettings,
        Capability::ManageBilling,
        Capability::ViewBilling,
        Capability::ManageClasses,
        Capability::ViewClasses,
        Capability::RecordAttendance,
        Capability::ManageRecitals,
        Capability::ManageCostumes,
        Capability::ManageVolunteers,
        Capability::VolunteerSignup,
        Capability::SendNewsletters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "users.manage",
            Capability::ManageSettings => "settings.manage",
            Capability::ManageBilling => "billing.manage",
            Capability::ViewBilling => "billing.view",
            Capability::ManageClasses => "classes.manage",
            Capability::ViewClasses => "classes.view",
            Capability::RecordAttendance => "attendance.record",
            Capability::ManageRecitals => "recitals.manage",
            Capability::ManageCostumes => "costumes.manage",
            Capability::ManageVolunteers => "volunteers.manage",
            Capability::VolunteerSignup => "volunteers.signup",
            Capability::SendNewsletters => "newsletters.send",
        }
    }

    /// Roles holding this capability.
    pub fn roles(&self) -> &'static [Role] {
        match self {
            Capability::ManageUsers | Capability::ManageSettings => ADMIN,
            Capability::ViewBilling | Capability::VolunteerSignup => BILLING_READERS,
            Capability::ViewClasses => EVERYONE,
            Capability::RecordAttendance => INSTRUCTORS,
            Capability::ManageBilling
            | Capability::ManageClasses
            | Capability::ManageRecitals
            | Capability::ManageCostumes
            | Capability::ManageVolunteers
            | Capability::SendNewsletters => ADMIN_STAFF,
        }
    }

    /// Area prefix of the capability name (`"billing"` for `billing.view`).
    pub fn category(&self) -> &'static str {
        self.as_str().split('.').next().unwrap_or_default()
    }

    /// All capabilities held by `role`.
    pub fn granted_to(role: Role) -> Vec<Capability> {
        Self::ALL
            .into_iter()
            .filter(|cap| cap.roles().contains(&role))
            .collect()
    }
}

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
