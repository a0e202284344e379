//! PostgreSQL-backed [`TransactionStore`] implementation using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, TransactionStore};
use crate::domain::{NewTransaction, Transaction, TransactionKind, TransactionPatch};

use super::error_map::{map_diesel_error, map_pool_error};
use super::models::{NewTransactionRow, TransactionChangeset, TransactionRow};
use super::pool::DbPool;
use super::schema::transactions;

/// Diesel-backed implementation of the transaction store port.
#[derive(Clone)]
pub struct DieselTransactionStore {
    pool: DbPool,
}

impl DieselTransactionStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a domain transaction.
///
/// The kind column is constrained by the application on every write; a
/// value outside the closed set means the row was tampered with and is
/// reported as a query failure.
fn row_to_transaction(row: TransactionRow) -> Result<Transaction, StoreError> {
    let TransactionRow {
        id,
        user_id,
        operator,
        kind,
        amount,
        occurred_at,
        raw_label,
        created_at,
    } = row;

    let kind = TransactionKind::parse(&kind)
        .map_err(|err| StoreError::query(format!("corrupt kind on row {id}: {err}")))?;

    Ok(Transaction {
        id,
        user_id,
        operator,
        kind,
        amount,
        occurred_at,
        raw_label,
        created_at,
    })
}

#[async_trait]
impl TransactionStore for DieselTransactionStore {
    async fn list_by_user(
        &self,
        user_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .select(TransactionRow::as_select())
            .into_boxed();
        if let Some(from) = from {
            query = query.filter(transactions::occurred_at.ge(from));
        }
        if let Some(to) = to {
            query = query.filter(transactions::occurred_at.lt(to));
        }

        let rows: Vec<TransactionRow> = query
            .order(transactions::occurred_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_transaction).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = transactions::table
            .find(id)
            .select(TransactionRow::as_select())
            .first::<TransactionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_transaction).transpose()
    }

    async fn create(&self, draft: &NewTransaction) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTransactionRow {
            user_id: draft.user_id(),
            operator: draft.operator(),
            kind: draft.kind().as_str(),
            amount: draft.amount(),
            occurred_at: draft.occurred_at(),
            raw_label: draft.raw_label(),
        };

        diesel::insert_into(transactions::table)
            .values(&new_row)
            .returning(transactions::id)
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn update(&self, id: i64, patch: &TransactionPatch) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        if patch.is_empty() {
            let found = transactions::table
                .find(id)
                .count()
                .get_result::<i64>(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            return Ok(found > 0);
        }

        let kind = patch.kind().map(TransactionKind::as_str);
        let changes = TransactionChangeset {
            operator: patch.operator(),
            kind,
            amount: patch.amount(),
            occurred_at: patch.occurred_at(),
            raw_label: patch.raw_label(),
        };

        let updated = diesel::update(transactions::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(transactions::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
