use std::sync::Arc;

use studio_auth::NavigationGuard;
use studio_infra::{InMemoryProfileStore, PostgresProfileStore, ProfileStore};

use crate::config::ApiConfig;

/// Shared, read-only services installed on every request.
pub struct AppServices {
    pub profiles: Arc<dyn ProfileStore>,
    pub navigation: NavigationGuard,
}

impl AppServices {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            profiles,
            navigation: NavigationGuard::default(),
        }
    }
}

/// Postgres when `DATABASE_URL` is set, otherwise an empty in-memory store.
pub async fn connect_profile_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn ProfileStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresProfileStore::connect(url, config.database_max_connections).await?;
            tracing::info!("using postgres profile store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using empty in-memory profile store");
            Ok(Arc::new(InMemoryProfileStore::new()))
        }
    }
}
