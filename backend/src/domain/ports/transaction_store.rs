//! Port abstraction for transaction persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewTransaction, Transaction, TransactionPatch};

use super::StoreError;

/// System of record for ledger transactions.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// List a user's transactions ordered by occurrence, newest first.
    ///
    /// The window is half-open: `from` is inclusive, `to` is exclusive, and
    /// each bound is independently optional.
    async fn list_by_user(
        &self,
        user_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Fetch a transaction by identifier.
    async fn get(&self, id: i64) -> Result<Option<Transaction>, StoreError>;

    /// Insert a validated transaction draft and return the assigned id.
    ///
    /// An unknown owning user surfaces as
    /// [`StoreError::ForeignKeyViolation`].
    async fn create(&self, draft: &NewTransaction) -> Result<i64, StoreError>;

    /// Apply a partial update; returns false when the id is unknown.
    async fn update(&self, id: i64, patch: &TransactionPatch) -> Result<bool, StoreError>;

    /// Delete a transaction; returns false when the id is unknown.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
