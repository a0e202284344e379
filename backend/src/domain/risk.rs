//! Spend-to-income risk indicator.
//!
//! The ratio relates one month's DEPOSIT total to the user's declared
//! monthly income. Only deposits count; there is no currency handling and
//! no partial-month proration.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{TransactionStore, UserStore};
use crate::domain::{DomainError, TransactionKind};

/// Policy threshold, in percent. Fixed; not configurable per user.
pub const RISK_THRESHOLD_PERCENT: u32 = 30;

/// True when the ratio meets or exceeds the policy threshold.
pub fn is_above_threshold(ratio: Decimal) -> bool {
    ratio >= Decimal::from(RISK_THRESHOLD_PERCENT)
}

/// Risk read-model returned by the ratio endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    /// Deposits over income for the month, in percent, two decimals.
    #[schema(value_type = String, example = "30.00")]
    pub ratio_percent: Decimal,
    /// Whether the ratio meets the 30 % policy threshold.
    pub above_30: bool,
}

/// Half-open date window `[start, end)` for one calendar month.
pub(crate) fn month_window(
    year: i32,
    month: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::invalid_request("month must be between 1 and 12"))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| DomainError::invalid_request("year is out of range"))?;
    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Computes the monthly spend-to-income ratio for a user.
#[derive(Clone)]
pub struct RiskService {
    users: Arc<dyn UserStore>,
    transactions: Arc<dyn TransactionStore>,
}

impl RiskService {
    /// Create a risk service over the ledger stores.
    pub fn new(users: Arc<dyn UserStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            users,
            transactions,
        }
    }

    /// Ratio of the month's deposits to the user's monthly income, in
    /// percent, rounded half-up to two decimals.
    ///
    /// Returns zero when the income is not positive; this is a
    /// division-by-zero guard, not an error.
    pub async fn monthly_ratio(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Decimal, DomainError> {
        let (from, to) = month_window(year, month)?;
        let user = self
            .users
            .get(user_id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::not_found("user not found"))?;

        let transactions = self
            .transactions
            .list_by_user(user_id, Some(from), Some(to))
            .await
            .map_err(DomainError::from)?;

        let deposits = transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Deposit)
            .fold(Decimal::ZERO, |sum, tx| sum + tx.amount);

        if user.monthly_income <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let mut ratio = (deposits / user.monthly_income * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // Pin the scale so 30 serializes as "30.00"; rescale never rounds
        // here because round_dp already capped the scale at two.
        ratio.rescale(2);
        Ok(ratio)
    }

    /// Ratio plus the threshold verdict, as served to clients.
    pub async fn monthly_report(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<RiskReport, DomainError> {
        let ratio_percent = self.monthly_ratio(user_id, year, month).await?;
        Ok(RiskReport {
            ratio_percent,
            above_30: is_above_threshold(ratio_percent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::StoreError;
    use crate::domain::{ErrorCode, NewTransaction, NewUserProfile, Transaction, UserProfile};
    use crate::domain::{TransactionPatch, UserPatch};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    struct StubUserStore {
        user: Option<UserProfile>,
    }

    #[async_trait]
    impl UserStore for StubUserStore {
        async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
            Ok(self.user.clone().into_iter().collect())
        }

        async fn get(&self, id: i64) -> Result<Option<UserProfile>, StoreError> {
            Ok(self.user.clone().filter(|user| user.id == id))
        }

        async fn create(&self, _draft: &NewUserProfile) -> Result<i64, StoreError> {
            unimplemented!("not exercised")
        }

        async fn update(&self, _id: i64, _patch: &UserPatch) -> Result<bool, StoreError> {
            unimplemented!("not exercised")
        }

        async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
            unimplemented!("not exercised")
        }
    }

    struct StubTransactionStore {
        transactions: Vec<Transaction>,
    }

    #[async_trait]
    impl TransactionStore for StubTransactionStore {
        async fn list_by_user(
            &self,
            user_id: i64,
            from: Option<DateTime<Utc>>,
            to: Option<DateTime<Utc>>,
        ) -> Result<Vec<Transaction>, StoreError> {
            Ok(self
                .transactions
                .iter()
                .filter(|tx| tx.user_id == user_id)
                .filter(|tx| from.is_none_or(|from| tx.occurred_at >= from))
                .filter(|tx| to.is_none_or(|to| tx.occurred_at < to))
                .cloned()
                .collect())
        }

        async fn get(&self, _id: i64) -> Result<Option<Transaction>, StoreError> {
            unimplemented!("not exercised")
        }

        async fn create(&self, _draft: &NewTransaction) -> Result<i64, StoreError> {
            unimplemented!("not exercised")
        }

        async fn update(
            &self,
            _id: i64,
            _patch: &TransactionPatch,
        ) -> Result<bool, StoreError> {
            unimplemented!("not exercised")
        }

        async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
            unimplemented!("not exercised")
        }
    }

    fn user(income: Decimal) -> UserProfile {
        UserProfile {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            monthly_income: income,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn tx(id: i64, kind: TransactionKind, amount: Decimal, occurred_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            user_id: 1,
            operator: "op".into(),
            kind,
            amount,
            occurred_at,
            raw_label: None,
            created_at: occurred_at,
        }
    }

    fn service(income: Decimal, transactions: Vec<Transaction>) -> RiskService {
        RiskService::new(
            Arc::new(StubUserStore {
                user: Some(user(income)),
            }),
            Arc::new(StubTransactionStore { transactions }),
        )
    }

    fn march(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn zero_income_guards_division() {
        let service = service(
            Decimal::ZERO,
            vec![tx(1, TransactionKind::Deposit, dec!(500), march(5))],
        );
        let ratio = service.monthly_ratio(1, 2025, 3).await.expect("ratio");
        assert_eq!(ratio, Decimal::ZERO);
        assert!(!is_above_threshold(ratio));
    }

    #[rstest]
    #[case(dec!(300), dec!(30.00), true)]
    #[case(dec!(299.995), dec!(30.00), true)]
    #[case(dec!(299.994), dec!(29.99), false)]
    #[case(dec!(150), dec!(15.00), false)]
    #[tokio::test]
    async fn ratio_rounds_half_up_to_two_decimals(
        #[case] deposited: Decimal,
        #[case] expected: Decimal,
        #[case] above: bool,
    ) {
        let service = service(
            dec!(1000),
            vec![tx(1, TransactionKind::Deposit, deposited, march(10))],
        );
        let ratio = service.monthly_ratio(1, 2025, 3).await.expect("ratio");
        assert_eq!(ratio, expected);
        assert_eq!(is_above_threshold(ratio), above);
    }

    #[tokio::test]
    async fn only_deposits_in_the_window_count() {
        let outside = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let service = service(
            dec!(1000),
            vec![
                tx(1, TransactionKind::Deposit, dec!(100), march(1)),
                tx(2, TransactionKind::Withdrawal, dec!(900), march(2)),
                tx(3, TransactionKind::Other, dec!(900), march(3)),
                // First instant of April sits outside the half-open window.
                tx(4, TransactionKind::Deposit, dec!(900), outside),
            ],
        );
        let ratio = service.monthly_ratio(1, 2025, 3).await.expect("ratio");
        assert_eq!(ratio, dec!(10.00));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let service = RiskService::new(
            Arc::new(StubUserStore { user: None }),
            Arc::new(StubTransactionStore {
                transactions: vec![],
            }),
        );
        let error = service.monthly_ratio(9, 2025, 3).await.expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    #[tokio::test]
    async fn out_of_range_month_is_a_validation_error(#[case] month: u32) {
        let service = service(dec!(1000), vec![]);
        let error = service
            .monthly_ratio(1, 2025, month)
            .await
            .expect_err("bad month");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn december_window_rolls_into_january() {
        let (from, to) = month_window(2025, 12).expect("window");
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }
}
