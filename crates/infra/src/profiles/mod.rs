//! Profile row store: the `profiles` table as seen by the access-control core.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use studio_auth::{Profile, ProfileSource, ProfileSourceError, Role};
use studio_core::ProfileId;

pub use in_memory::InMemoryProfileStore;
pub use postgres::PostgresProfileStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("database error in {operation}: {message}")]
    Database { operation: &'static str, message: String },

    #[error("failed to decode profile row: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ProfileSourceError {
    fn from(err: StoreError) -> Self {
        ProfileSourceError::Unavailable(err.to_string())
    }
}

/// Fetch-by-filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFilter {
    pub role: Option<Role>,
    /// Case-insensitive substring match on email.
    pub email_contains: Option<String>,
    pub limit: u32,
}

impl ProfileFilter {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 500;

    pub fn new(role: Option<Role>, email_contains: Option<String>, limit: Option<u32>) -> Self {
        Self {
            role,
            email_contains: email_contains.filter(|s| !s.trim().is_empty()),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).min(Self::MAX_LIMIT),
        }
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        if let Some(role) = self.role {
            if profile.role != Some(role) {
                return false;
            }
        }
        match &self.email_contains {
            Some(needle) => profile
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&needle.to_lowercase())),
            None => true,
        }
    }
}

impl Default for ProfileFilter {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// Row store over profiles.
///
/// Extends [`ProfileSource`] (fetch by identity id) with fetch-by-filter and writes.
#[async_trait]
pub trait ProfileStore: ProfileSource {
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError>;

    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError>;

    /// Set a profile's role; returns the updated profile, or `None` if it does not exist.
    async fn set_role(&self, id: ProfileId, role: Role) -> Result<Option<Profile>, StoreError>;
}
