//! Transaction entity, the closed kind set, and validated mutation inputs.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation failures raised while building [`NewTransaction`] or
/// [`TransactionPatch`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    InvalidUserId,
    EmptyOperator,
    EmptyKind,
    UnknownKind,
    NegativeAmount,
    ZeroTimestamp,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUserId => write!(f, "user id must be positive"),
            Self::EmptyOperator => write!(f, "operator must not be empty"),
            Self::EmptyKind => write!(f, "kind must not be empty"),
            Self::UnknownKind => {
                write!(f, "kind must be one of DEPOSIT, WITHDRAWAL or OTHER")
            }
            Self::NegativeAmount => write!(f, "amount must not be negative"),
            Self::ZeroTimestamp => write!(f, "occurred-at must be a real point in time"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Closed set of transaction kinds.
///
/// Input is matched case-insensitively with surrounding whitespace ignored;
/// the stored and serialized form is always upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Other,
}

impl TransactionKind {
    /// Parse a raw kind label.
    pub fn parse(raw: &str) -> Result<Self, TransactionValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TransactionValidationError::EmptyKind);
        }
        if trimmed.eq_ignore_ascii_case("deposit") {
            Ok(Self::Deposit)
        } else if trimmed.eq_ignore_ascii_case("withdrawal") {
            Ok(Self::Withdrawal)
        } else if trimmed.eq_ignore_ascii_case("other") {
            Ok(Self::Other)
        } else {
            Err(TransactionValidationError::UnknownKind)
        }
    }

    /// Canonical upper-case label, as persisted and serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TransactionKind> for String {
    fn from(value: TransactionKind) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = TransactionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// A single ledger movement belonging to a user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning user profile; referential integrity is a store constraint.
    pub user_id: i64,
    /// Counterparty label from the statement line, trimmed.
    pub operator: String,
    /// Movement kind.
    pub kind: TransactionKind,
    /// Movement amount, never negative.
    #[schema(value_type = String, example = "120.50")]
    pub amount: Decimal,
    /// When the movement happened.
    pub occurred_at: DateTime<Utc>,
    /// Original statement line, kept for traceability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_label: Option<String>,
    /// Set once by the store on insert.
    pub created_at: DateTime<Utc>,
}

/// Returns true when the timestamp is the zero value used by uninitialized
/// inputs.
fn is_zero_timestamp(value: DateTime<Utc>) -> bool {
    value == DateTime::<Utc>::UNIX_EPOCH
}

/// Validated input for creating a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    user_id: i64,
    operator: String,
    kind: TransactionKind,
    amount: Decimal,
    occurred_at: DateTime<Utc>,
    raw_label: Option<String>,
}

impl NewTransaction {
    /// Validate and construct a new transaction draft.
    pub fn new(
        user_id: i64,
        operator: impl Into<String>,
        kind: &str,
        amount: Decimal,
        occurred_at: DateTime<Utc>,
        raw_label: Option<String>,
    ) -> Result<Self, TransactionValidationError> {
        if user_id <= 0 {
            return Err(TransactionValidationError::InvalidUserId);
        }
        let operator = operator.into().trim().to_owned();
        if operator.is_empty() {
            return Err(TransactionValidationError::EmptyOperator);
        }
        let kind = TransactionKind::parse(kind)?;
        if amount < Decimal::ZERO {
            return Err(TransactionValidationError::NegativeAmount);
        }
        if is_zero_timestamp(occurred_at) {
            return Err(TransactionValidationError::ZeroTimestamp);
        }
        Ok(Self {
            user_id,
            operator,
            kind,
            amount,
            occurred_at,
            raw_label,
        })
    }

    /// Owning user profile id.
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Trimmed counterparty label.
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Parsed movement kind.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Movement amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// When the movement happened.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Original statement line, if any.
    pub fn raw_label(&self) -> Option<&str> {
        self.raw_label.as_deref()
    }
}

/// Partial update for a transaction.
///
/// `None` fields leave the stored value untouched. Amount and kind are
/// re-validated when supplied; a supplied operator is trimmed. There is no
/// way to clear a raw label short of overwriting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    operator: Option<String>,
    kind: Option<TransactionKind>,
    amount: Option<Decimal>,
    occurred_at: Option<DateTime<Utc>>,
    raw_label: Option<String>,
}

impl TransactionPatch {
    /// Validate and construct a patch from optional raw fields.
    pub fn new(
        operator: Option<String>,
        kind: Option<String>,
        amount: Option<Decimal>,
        occurred_at: Option<DateTime<Utc>>,
        raw_label: Option<String>,
    ) -> Result<Self, TransactionValidationError> {
        let operator = operator.map(|raw| raw.trim().to_owned());
        let kind = match kind {
            Some(raw) => Some(TransactionKind::parse(&raw)?),
            None => None,
        };
        if matches!(amount, Some(value) if value < Decimal::ZERO) {
            return Err(TransactionValidationError::NegativeAmount);
        }
        Ok(Self {
            operator,
            kind,
            amount,
            occurred_at,
            raw_label,
        })
    }

    /// Replacement operator, if supplied.
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    /// Replacement kind, if supplied.
    pub fn kind(&self) -> Option<TransactionKind> {
        self.kind
    }

    /// Replacement amount, if supplied.
    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Replacement timestamp, if supplied.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.occurred_at
    }

    /// Replacement raw label, if supplied.
    pub fn raw_label(&self) -> Option<&str> {
        self.raw_label.as_deref()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.operator.is_none()
            && self.kind.is_none()
            && self.amount.is_none()
            && self.occurred_at.is_none()
            && self.raw_label.is_none()
    }
}
