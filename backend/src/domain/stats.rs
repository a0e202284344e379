//! Monthly deposit/withdrawal aggregation for visualization.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::TransactionStore;
use crate::domain::{DomainError, Transaction, TransactionKind};

/// One aggregated month of ledger activity.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdownRow {
    /// Calendar month label, `YYYY-MM`.
    #[schema(example = "2025-03")]
    pub year_month: String,
    /// Sum of DEPOSIT amounts in the month.
    #[schema(value_type = String, example = "1500.00")]
    pub deposits: Decimal,
    /// Sum of WITHDRAWAL amounts in the month.
    #[schema(value_type = String, example = "250.00")]
    pub withdrawals: Decimal,
}

/// Half-open date window `[Jan 1 year, Jan 1 year+1)`.
fn year_window(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| DomainError::invalid_request("year is out of range"))?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .ok_or_else(|| DomainError::invalid_request("year is out of range"))?;
    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Group transactions by calendar month and sum deposits and withdrawals.
///
/// Months without any transaction are omitted rather than zero-filled;
/// callers must expect a sparse, ascending series. OTHER movements keep a
/// month present but contribute to neither sum.
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlyBreakdownRow> {
    let mut months: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let key = (tx.occurred_at.year(), tx.occurred_at.month());
        let entry = months.entry(key).or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            TransactionKind::Deposit => entry.0 += tx.amount,
            TransactionKind::Withdrawal => entry.1 += tx.amount,
            TransactionKind::Other => {}
        }
    }
    months
        .into_iter()
        .map(|((year, month), (deposits, withdrawals))| MonthlyBreakdownRow {
            year_month: format!("{year:04}-{month:02}"),
            deposits,
            withdrawals,
        })
        .collect()
}

/// Serves the per-month aggregate query for one user and year.
#[derive(Clone)]
pub struct StatsService {
    transactions: Arc<dyn TransactionStore>,
}

impl StatsService {
    /// Create a stats service over the transaction store.
    pub fn new(transactions: Arc<dyn TransactionStore>) -> Self {
        Self { transactions }
    }

    /// Aggregate one calendar year of a user's ledger by month.
    ///
    /// A user without transactions yields an empty series; user existence
    /// is deliberately not checked here.
    pub async fn monthly_breakdown(
        &self,
        user_id: i64,
        year: i32,
    ) -> Result<Vec<MonthlyBreakdownRow>, DomainError> {
        let (from, to) = year_window(year)?;
        let transactions = self
            .transactions
            .list_by_user(user_id, Some(from), Some(to))
            .await
            .map_err(DomainError::from)?;
        Ok(monthly_breakdown(&transactions))
    }
}
