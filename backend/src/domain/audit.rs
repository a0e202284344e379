//! Audit events emitted after successful ledger mutations.

use std::fmt;

use rust_decimal::Decimal;

/// One audit-trail entry, rendered as a single log line.
///
/// Line formats follow the historical audit log so existing tooling keeps
/// parsing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    UserCreated { id: i64, email: String },
    UserUpdated { id: i64 },
    UserDeleted { id: i64 },
    TransactionCreated { id: i64, user_id: i64, amount: Decimal },
    TransactionUpdated { id: i64 },
    TransactionDeleted { id: i64 },
    TransactionsImported { count: usize },
    TransactionsExported { user_id: i64, count: usize },
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserCreated { id, email } => {
                write!(f, "CREATE USER id={id} email={email}")
            }
            Self::UserUpdated { id } => write!(f, "UPDATE USER id={id}"),
            Self::UserDeleted { id } => write!(f, "DELETE USER id={id}"),
            Self::TransactionCreated {
                id,
                user_id,
                amount,
            } => write!(f, "CREATE TX id={id} user={user_id} amount={amount}"),
            Self::TransactionUpdated { id } => write!(f, "UPDATE TX id={id}"),
            Self::TransactionDeleted { id } => write!(f, "DELETE TX id={id}"),
            Self::TransactionsImported { count } => write!(f, "IMPORT JSON count={count}"),
            Self::TransactionsExported { user_id, count } => {
                write!(f, "EXPORT JSON user={user_id} count={count}")
            }
        }
    }
}
