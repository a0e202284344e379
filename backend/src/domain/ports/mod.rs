//! Ports the domain exposes to adapters.
//!
//! Driven ports ([`UserStore`], [`TransactionStore`], [`CredentialStore`],
//! [`AuditSink`]) are implemented by outbound adapters; the driving port
//! ([`LoginService`]) is implemented by the domain and called by inbound
//! adapters.

mod audit_sink;
mod credential_store;
mod login_service;
mod store_error;
mod transaction_store;
mod user_store;

pub use audit_sink::{AuditSink, AuditSinkError};
pub use credential_store::{Credential, CredentialStore};
pub use login_service::LoginService;
pub use store_error::StoreError;
pub use transaction_store::TransactionStore;
pub use user_store::UserStore;
