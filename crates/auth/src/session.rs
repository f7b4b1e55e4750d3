//! Session resolver: lazily loads the caller's profile, at most once per lifecycle.
//!
//! A lifecycle is one server request, or one client session spanning many
//! navigations. The resolver is an explicit value owned by that lifecycle;
//! nothing is shared between callers, so no locking is involved.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use studio_core::ProfileId;

use crate::{Identity, Profile};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileSourceError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Upstream row store, as seen by the resolver.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, id: ProfileId) -> Result<Option<Profile>, ProfileSourceError>;
}

#[async_trait]
impl<S> ProfileSource for Arc<S>
where
    S: ProfileSource + ?Sized,
{
    async fn fetch_profile(&self, id: ProfileId) -> Result<Option<Profile>, ProfileSourceError> {
        (**self).fetch_profile(id).await
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no authenticated session")]
    Unauthenticated,

    /// The session is valid but its profile row is missing (data-integrity fault).
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),

    #[error(transparent)]
    Source(#[from] ProfileSourceError),
}

pub struct SessionResolver<S: ?Sized> {
    identity: Option<Identity>,
    profile: Option<Profile>,
    source: Arc<S>,
}

impl<S> SessionResolver<S>
where
    S: ProfileSource + ?Sized,
{
    pub fn new(identity: Option<Identity>, source: Arc<S>) -> Self {
        Self {
            identity,
            profile: None,
            source,
        }
    }

    pub fn anonymous(source: Arc<S>) -> Self {
        Self::new(None, source)
    }

    /// Resolver for a lifecycle whose profile was already loaded (e.g. by a route layer).
    pub fn with_loaded(identity: Identity, profile: Profile, source: Arc<S>) -> Self {
        Self {
            identity: Some(identity),
            profile: Some(profile),
            source,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.profile.is_some()
    }

    /// The cached profile, without triggering a load.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Fetch the profile for the current identity, or return the cached one.
    pub async fn load(&mut self) -> Result<&Profile, SessionError> {
        if self.profile.is_none() {
            let id = self
                .identity
                .as_ref()
                .map(|identity| identity.id)
                .ok_or(SessionError::Unauthenticated)?;

            let mut profile = self
                .source
                .fetch_profile(id)
                .await?
                .ok_or(SessionError::ProfileNotFound(id))?;

            if profile.email.is_none() {
                profile.email = self.identity.as_ref().and_then(|i| i.email.clone());
            }

            tracing::debug!(profile_id = %id, role = profile.role_name(), "profile loaded");
            self.profile = Some(profile);
        }

        self.profile.as_ref().ok_or(SessionError::Unauthenticated)
    }

    /// Discard the cached profile.
    pub fn clear(&mut self) {
        self.profile = None;
    }

    /// Replace the identity (login); any cached profile belongs to the old one.
    pub fn begin_session(&mut self, identity: Identity) {
        self.clear();
        self.identity = Some(identity);
    }

    /// Session ended (logout).
    pub fn end_session(&mut self) {
        self.clear();
        self.identity = None;
    }
}
