//! Port abstraction for the best-effort audit trail.

use async_trait::async_trait;

use crate::domain::AuditEvent;

/// Failures raised by audit sink adapters.
///
/// Callers are expected to log and swallow these; an audit failure must
/// never affect the mutation that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditSinkError {
    /// The underlying sink rejected the write.
    #[error("audit write failed: {message}")]
    Io { message: String },
}

impl AuditSinkError {
    /// Create an I/O error with the given message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

/// Append-only sink for audit lines and JSON snapshots.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one audit line for the event.
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditSinkError>;

    /// Overwrite the snapshot document with the given payload.
    async fn snapshot(&self, payload: &serde_json::Value) -> Result<(), AuditSinkError>;
}
