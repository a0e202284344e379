//! Failure taxonomy shared by the persistence ports.

use crate::domain::DomainError;

/// Persistence failures raised by store adapters.
///
/// Constraint violations carry the domain-facing field or reference name so
/// the mapping to a validation error can speak the caller's language rather
/// than leak driver text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or a connection could not be checked
    /// out.
    #[error("store connection failed: {message}")]
    Connection { message: String },

    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },

    /// A uniqueness constraint rejected the write.
    #[error("{field} already in use")]
    UniqueViolation { field: String },

    /// A referential-integrity constraint rejected the write.
    #[error("{reference} does not exist")]
    ForeignKeyViolation { reference: String },
}

impl StoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a uniqueness-violation error naming the conflicting field.
    pub fn unique_violation(field: impl Into<String>) -> Self {
        Self::UniqueViolation {
            field: field.into(),
        }
    }

    /// Create a referential-integrity error naming the missing reference.
    pub fn foreign_key_violation(reference: impl Into<String>) -> Self {
        Self::ForeignKeyViolation {
            reference: reference.into(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Connection { message } => DomainError::service_unavailable(message),
            StoreError::Query { message } => DomainError::internal(message),
            StoreError::UniqueViolation { .. } | StoreError::ForeignKeyViolation { .. } => {
                DomainError::invalid_request(error.to_string())
            }
        }
    }
}
