//! Postgres-backed profile store.
//!
//! Reads and writes the hosted database's `profiles` table:
//!
//! ```sql
//! CREATE TABLE profiles (
//!     id         uuid PRIMARY KEY,
//!     email      text,
//!     full_name  text,
//!     user_role  text
//! );
//! ```
//!
//! `user_role` is free text in the database. Values outside the studio role
//! set load as an unrecognized role rather than failing the row.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use studio_auth::{Profile, ProfileSource, ProfileSourceError, Role};
use studio_core::ProfileId;

use super::{ProfileFilter, ProfileStore, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresProfileStore {
    pool: Arc<PgPool>,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    #[instrument(skip(self, id), fields(profile_id = %id), err)]
    async fn fetch_row(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, full_name, user_role
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_profile", e))?;

        row.as_ref().map(profile_from_row).transpose()
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Decode(e.to_string());

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let raw_role: Option<String> = row.try_get("user_role").map_err(decode)?;
    let email: Option<String> = row.try_get("email").map_err(decode)?;
    let full_name: Option<String> = row.try_get("full_name").map_err(decode)?;

    let mut profile = Profile::from_stored_role(ProfileId::from_uuid(id), raw_role.as_deref());
    profile.email = email;
    profile.full_name = full_name;
    Ok(profile)
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Database {
            operation,
            message: db_err.message().to_string(),
        },
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{operation}: {err}"))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Decode(err.to_string())
        }
        other => StoreError::Database {
            operation,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl ProfileSource for PostgresProfileStore {
    async fn fetch_profile(&self, id: ProfileId) -> Result<Option<Profile>, ProfileSourceError> {
        Ok(self.fetch_row(id).await?)
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    #[instrument(skip(self), err)]
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, full_name, user_role
            FROM profiles
            WHERE ($1::text IS NULL OR user_role = $1)
                AND ($2::text IS NULL OR email ILIKE '%' || $2 || '%')
            ORDER BY email ASC NULLS LAST, id ASC
            LIMIT $3
            "#,
        )
        .bind(filter.role.map(|r| r.as_str()))
        .bind(filter.email_contains.as_deref())
        .bind(i64::from(filter.limit))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_profiles", e))?;

        rows.iter().map(profile_from_row).collect()
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id), err)]
    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, full_name, user_role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                full_name = EXCLUDED.full_name,
                user_role = EXCLUDED.user_role
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.email.as_deref())
        .bind(profile.full_name.as_deref())
        .bind(profile.role.map(|r| r.as_str()))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_profile", e))?;

        Ok(())
    }

    #[instrument(skip(self, id, role), fields(profile_id = %id, role = %role), err)]
    async fn set_role(&self, id: ProfileId, role: Role) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE profiles
            SET user_role = $2
            WHERE id = $1
            RETURNING id, email, full_name, user_role
            "#,
        )
        .bind(id.as_uuid())
        .bind(role.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("set_role", e))?;

        row.as_ref().map(profile_from_row).transpose()
    }
}
