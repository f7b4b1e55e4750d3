//! Infrastructure layer: row-store adapters for the access-control core.

pub mod profiles;

pub use profiles::{InMemoryProfileStore, PostgresProfileStore, ProfileFilter, ProfileStore, StoreError};
