//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data` so they only
//! depend on domain ports and stay testable without I/O.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{AuditSink, LoginService, TransactionStore, UserStore};
use crate::domain::{AuditEvent, RiskService, StatsService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub login: Arc<dyn LoginService>,
    pub audit: Arc<dyn AuditSink>,
    pub risk: RiskService,
    pub stats: StatsService,
}

impl HttpState {
    /// Assemble the handler state, deriving the calculators from the
    /// stores.
    pub fn new(
        users: Arc<dyn UserStore>,
        transactions: Arc<dyn TransactionStore>,
        login: Arc<dyn LoginService>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let risk = RiskService::new(Arc::clone(&users), Arc::clone(&transactions));
        let stats = StatsService::new(Arc::clone(&transactions));
        Self {
            users,
            transactions,
            login,
            audit,
            risk,
            stats,
        }
    }

    /// Append an audit line, best-effort.
    ///
    /// Failures are logged and swallowed; the triggering mutation has
    /// already succeeded and must not be affected.
    pub async fn record_audit(&self, event: AuditEvent) {
        if let Err(error) = self.audit.record(&event).await {
            warn!(%error, %event, "audit append failed");
        }
    }

    /// Write a JSON snapshot, best-effort.
    pub async fn write_snapshot(&self, payload: &serde_json::Value) {
        if let Err(error) = self.audit.snapshot(payload).await {
            warn!(%error, "snapshot write failed");
        }
    }
}
