//! PostgreSQL-backed [`UserStore`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, UserStore};
use crate::domain::{NewUserProfile, UserPatch, UserProfile};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user store port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: UserRow) -> UserProfile {
    let UserRow {
        id,
        name,
        email,
        monthly_income,
        created_at,
    } = row;
    UserProfile {
        id,
        name,
        email,
        monthly_income,
        created_at,
    }
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.desc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_profile).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<UserProfile>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(id)
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_profile))
    }

    async fn create(&self, draft: &NewUserProfile) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: draft.name(),
            email: draft.email(),
            monthly_income: draft.monthly_income(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .returning(users::id)
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // An all-None changeset is a Diesel error; degrade to an existence
        // probe so the caller still gets its found/not-found answer.
        if patch.is_empty() {
            let found = users::table
                .find(id)
                .count()
                .get_result::<i64>(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            return Ok(found > 0);
        }

        let changes = UserChangeset {
            name: patch.name(),
            email: patch.email(),
            monthly_income: patch.monthly_income(),
        };

        let updated = diesel::update(users::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
