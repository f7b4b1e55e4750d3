use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use studio_auth::{Profile, ProfileSource, ProfileSourceError, Role};
use studio_core::ProfileId;

use super::{ProfileFilter, ProfileStore, StoreError};

/// In-memory profile store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    inner: RwLock<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            inner: RwLock::new(profiles.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("profile map lock poisoned".to_string())
    }
}

#[async_trait]
impl ProfileSource for InMemoryProfileStore {
    async fn fetch_profile(&self, id: ProfileId) -> Result<Option<Profile>, ProfileSourceError> {
        let map = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(map.get(&id).cloned())
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        let map = self.inner.read().map_err(|_| Self::poisoned())?;

        let mut items: Vec<Profile> = map.values().filter(|p| filter.matches(p)).cloned().collect();
        items.sort_by(|a, b| a.email.cmp(&b.email).then(a.id.cmp(&b.id)));
        items.truncate(filter.limit as usize);
        Ok(items)
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        map.insert(profile.id, profile);
        Ok(())
    }

    async fn set_role(&self, id: ProfileId, role: Role) -> Result<Option<Profile>, StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        Ok(map.get_mut(&id).map(|p| {
            p.role = Some(role);
            p.clone()
        }))
    }
}
