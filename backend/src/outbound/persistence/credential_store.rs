//! PostgreSQL-backed [`CredentialStore`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{Credential, CredentialStore, StoreError};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::CredentialRow;
use super::pool::DbPool;
use super::schema::user_accounts;

/// Diesel-backed implementation of the credential store port.
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
}

impl DieselCredentialStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = user_accounts::table
            .filter(user_accounts::username.eq(username))
            .select(CredentialRow::as_select())
            .first::<CredentialRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|row| Credential {
            user_id: row.user_id,
            username: row.username,
            password_hash: row.password_hash,
            role: row.role,
        }))
    }
}
