//! Shared mapping from pool and Diesel failures to store-port errors.

use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool failures onto the connection variant.
pub(super) fn map_pool_error(error: PoolError) -> StoreError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    StoreError::connection(message)
}

/// Translate a constraint name into the domain-facing field it guards.
fn constraint_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("email") => "email",
        Some(name) if name.contains("username") => "username",
        _ => "value",
    }
}

/// Map Diesel failures onto store-port errors.
///
/// Constraint violations become typed variants so the domain can phrase
/// them as validation errors; everything else stays a query/connection
/// failure whose text is redacted at the HTTP edge.
pub(super) fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::unique_violation(constraint_field(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StoreError::foreign_key_violation("user")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::connection(info.message().to_owned())
        }
        other => StoreError::query(other.to_string()),
    }
}
