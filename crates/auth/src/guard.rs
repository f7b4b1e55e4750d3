//! Request guard: the server-side gate every protected handler passes through.
//!
//! Guards terminate instead of redirecting. Failures carry a status code and a
//! message; handlers propagate them unchanged to the HTTP response.

use thiserror::Error;

use studio_core::ProfileId;

use crate::gate;
use crate::requirement::describe_roles;
use crate::session::{ProfileSource, SessionError, SessionResolver};
use crate::{ADMIN_ACCESS_ROLES, Capability, Profile, Role, RoleRequirement};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// No session.
    #[error("authentication required")]
    Unauthorized,

    /// Session present, role insufficient.
    #[error("forbidden: requires {required}")]
    Forbidden {
        profile_id: ProfileId,
        role: Option<Role>,
        required: String,
    },

    #[error("no profile exists for authenticated user {0}")]
    ProfileNotFound(ProfileId),

    #[error("profile lookup failed: {0}")]
    Unavailable(String),
}

impl GuardError {
    /// HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            GuardError::Unauthorized => 401,
            GuardError::Forbidden { .. } => 403,
            GuardError::ProfileNotFound(_) => 404,
            GuardError::Unavailable(_) => 503,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::Unauthorized => "unauthorized",
            GuardError::Forbidden { .. } => "forbidden",
            GuardError::ProfileNotFound(_) => "profile_not_found",
            GuardError::Unavailable(_) => "profile_unavailable",
        }
    }

    fn forbidden(profile: &Profile, required: String) -> Self {
        tracing::warn!(
            profile_id = %profile.id,
            role = profile.role_name(),
            required = %required,
            "request denied"
        );
        GuardError::Forbidden {
            profile_id: profile.id,
            role: profile.role,
            required,
        }
    }
}

impl From<SessionError> for GuardError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthenticated => GuardError::Unauthorized,
            SessionError::ProfileNotFound(id) => {
                tracing::error!(profile_id = %id, "authenticated session has no profile row");
                GuardError::ProfileNotFound(id)
            }
            SessionError::Source(e) => GuardError::Unavailable(e.to_string()),
        }
    }
}

/// Resolve the session; fails with `Unauthorized` when there is none.
pub async fn require_auth<S>(session: &mut SessionResolver<S>) -> Result<Profile, GuardError>
where
    S: ProfileSource + ?Sized,
{
    Ok(session.load().await?.clone())
}

/// Resolve the session and evaluate `requirement`.
pub async fn require<S>(
    session: &mut SessionResolver<S>,
    requirement: &RoleRequirement,
) -> Result<Profile, GuardError>
where
    S: ProfileSource + ?Sized,
{
    let profile = require_auth(session).await?;
    if gate::satisfies(Some(&profile), requirement) {
        Ok(profile)
    } else {
        Err(GuardError::forbidden(&profile, requirement.describe()))
    }
}

/// Resolve the session and require one of `roles`; a single [`Role`] is accepted too.
pub async fn require_role<S, R>(session: &mut SessionResolver<S>, roles: R) -> Result<Profile, GuardError>
where
    S: ProfileSource + ?Sized,
    R: AsRef<[Role]>,
{
    let profile = require_auth(session).await?;
    let roles = roles.as_ref();
    if gate::has_role(Some(&profile), roles) {
        Ok(profile)
    } else {
        let required = match roles {
            [role] => RoleRequirement::Role(*role).describe(),
            many => describe_roles(many),
        };
        Err(GuardError::forbidden(&profile, required))
    }
}

/// Admin only; staff are rejected.
pub async fn require_admin<S>(session: &mut SessionResolver<S>) -> Result<Profile, GuardError>
where
    S: ProfileSource + ?Sized,
{
    require(session, &RoleRequirement::Role(Role::Admin)).await
}

/// Admin or staff.
pub async fn require_admin_access<S>(
    session: &mut SessionResolver<S>,
) -> Result<Profile, GuardError>
where
    S: ProfileSource + ?Sized,
{
    require(session, &RoleRequirement::AnyOf(ADMIN_ACCESS_ROLES)).await
}

/// Check a capability against an already-resolved profile.
pub fn require_permission(profile: &Profile, capability: Capability) -> Result<(), GuardError> {
    if gate::has_permission(Some(profile), capability) {
        Ok(())
    } else {
        let requirement = RoleRequirement::Capability(capability);
        Err(GuardError::forbidden(profile, requirement.describe()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::testing::{CountingSource, identity};

    fn session_for(profile: &Profile) -> (SessionResolver<CountingSource>, Arc<CountingSource>) {
        let source = Arc::new(CountingSource::with([profile.clone()]));
        (
            SessionResolver::new(Some(identity(profile.id)), source.clone()),
            source,
        )
    }

    #[tokio::test]
    async fn no_session_is_unauthorized() {
        let mut session = SessionResolver::anonymous(Arc::new(CountingSource::default()));
        let err = require_admin(&mut session).await.unwrap_err();
        assert_eq!(err, GuardError::Unauthorized);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.code(), "unauthorized");
    }

    #[tokio::test]
    async fn student_on_admin_endpoint_is_forbidden() {
        let student = Profile::new(ProfileId::new(), Role::Student);
        let (mut session, _) = session_for(&student);

        let err = require_admin(&mut session).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err,
            GuardError::Forbidden {
                profile_id: student.id,
                role: Some(Role::Student),
                required: "role 'admin'".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn admin_gets_loaded_profile() {
        let admin = Profile::new(ProfileId::new(), Role::Admin);
        let (mut session, _) = session_for(&admin);

        assert_eq!(require_admin(&mut session).await.unwrap(), admin);
    }

    #[tokio::test]
    async fn staff_passes_admin_access_but_not_admin() {
        let staff = Profile::new(ProfileId::new(), Role::Staff);
        let (mut session, source) = session_for(&staff);

        assert!(require_admin_access(&mut session).await.is_ok());
        assert!(matches!(
            require_admin(&mut session).await,
            Err(GuardError::Forbidden { .. })
        ));
        // Both checks share one load.
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn require_role_accepts_any_listed_role() {
        let parent = Profile::new(ProfileId::new(), Role::Parent);
        let (mut session, _) = session_for(&parent);

        let profile = require_role(&mut session, [Role::Teacher, Role::Parent])
            .await
            .unwrap();
        assert_eq!(profile.id, parent.id);

        let allowed: Vec<Role> = vec![Role::Admin, Role::Parent];
        assert!(require_role(&mut session, &allowed).await.is_ok());

        let err = require_role(&mut session, [Role::Teacher, Role::Student])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "forbidden: requires one of roles [teacher, student]");
    }

    #[tokio::test]
    async fn require_role_accepts_a_single_role() {
        let teacher = Profile::new(ProfileId::new(), Role::Teacher);
        let (mut session, source) = session_for(&teacher);

        assert_eq!(require_role(&mut session, Role::Teacher).await.unwrap(), teacher);

        let err = require_role(&mut session, Role::Admin).await.unwrap_err();
        assert_eq!(err.to_string(), "forbidden: requires role 'admin'");
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn missing_profile_maps_to_not_found() {
        let id = ProfileId::new();
        let mut session =
            SessionResolver::new(Some(identity(id)), Arc::new(CountingSource::default()));

        let err = require_auth(&mut session).await.unwrap_err();
        assert_eq!(err, GuardError::ProfileNotFound(id));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn permission_check_uses_capability_table() {
        let teacher = Profile::new(ProfileId::new(), Role::Teacher);
        assert!(require_permission(&teacher, Capability::RecordAttendance).is_ok());

        let err = require_permission(&teacher, Capability::SendNewsletters).unwrap_err();
        assert_eq!(err.code(), "forbidden");
        assert_eq!(err.to_string(), "forbidden: requires capability 'newsletters.send'");
    }
}
