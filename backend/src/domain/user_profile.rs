//! User profile entity and the validated inputs that mutate it.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation failures raised while building [`NewUserProfile`] or
/// [`UserPatch`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    NegativeIncome,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::NegativeIncome => write!(f, "monthly income must not be negative"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// A ledger account holder with a declared monthly income.
///
/// Identifier and creation timestamp are assigned by the store and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name, non-empty.
    pub name: String,
    /// Contact email, unique within the store.
    pub email: String,
    /// Declared monthly income, never negative.
    #[schema(value_type = String, example = "4500.00")]
    pub monthly_income: Decimal,
    /// Set once by the store on insert.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a user profile.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserProfile {
    name: String,
    email: String,
    monthly_income: Decimal,
}

impl NewUserProfile {
    /// Validate and construct a new profile draft.
    ///
    /// Name and email are trimmed and must be non-empty; income must not be
    /// negative.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        monthly_income: Decimal,
    ) -> Result<Self, UserValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        let email = email.into().trim().to_owned();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if monthly_income < Decimal::ZERO {
            return Err(UserValidationError::NegativeIncome);
        }
        Ok(Self {
            name,
            email,
            monthly_income,
        })
    }

    /// Validated display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Validated monthly income.
    pub fn monthly_income(&self) -> Decimal {
        self.monthly_income
    }
}

/// Partial update for a user profile.
///
/// `None` fields leave the stored value untouched; supplied fields are
/// validated with the same rules as creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    name: Option<String>,
    email: Option<String>,
    monthly_income: Option<Decimal>,
}

impl UserPatch {
    /// Validate and construct a patch from optional raw fields.
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        monthly_income: Option<Decimal>,
    ) -> Result<Self, UserValidationError> {
        let name = match name {
            Some(raw) => {
                let trimmed = raw.trim().to_owned();
                if trimmed.is_empty() {
                    return Err(UserValidationError::EmptyName);
                }
                Some(trimmed)
            }
            None => None,
        };
        let email = match email {
            Some(raw) => {
                let trimmed = raw.trim().to_owned();
                if trimmed.is_empty() {
                    return Err(UserValidationError::EmptyEmail);
                }
                Some(trimmed)
            }
            None => None,
        };
        if matches!(monthly_income, Some(income) if income < Decimal::ZERO) {
            return Err(UserValidationError::NegativeIncome);
        }
        Ok(Self {
            name,
            email,
            monthly_income,
        })
    }

    /// Replacement name, if supplied.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replacement email, if supplied.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Replacement income, if supplied.
    pub fn monthly_income(&self) -> Option<Decimal> {
        self.monthly_income
    }

    /// True when no field is set; such a patch degenerates to an existence
    /// probe at the store.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.monthly_income.is_none()
    }
}
