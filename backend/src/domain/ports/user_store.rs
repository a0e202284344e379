//! Port abstraction for user-profile persistence.

use async_trait::async_trait;

use crate::domain::{NewUserProfile, UserPatch, UserProfile};

use super::StoreError;

/// System of record for user profiles.
///
/// Mutations are atomic at single-entity granularity; `update` and `delete`
/// report absence through their boolean result rather than an error so that
/// repeated deletes stay idempotent.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// List all profiles, most recently created first.
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError>;

    /// Fetch a profile by identifier.
    async fn get(&self, id: i64) -> Result<Option<UserProfile>, StoreError>;

    /// Insert a validated profile draft and return the assigned id.
    async fn create(&self, draft: &NewUserProfile) -> Result<i64, StoreError>;

    /// Apply a partial update; returns false when the id is unknown.
    async fn update(&self, id: i64, patch: &UserPatch) -> Result<bool, StoreError>;

    /// Delete a profile; returns false when the id is unknown.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
