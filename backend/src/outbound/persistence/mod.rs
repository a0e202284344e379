//! Diesel persistence adapters and supporting infrastructure.

mod credential_store;
mod error_map;
mod models;
mod pool;
pub mod schema;
mod transaction_store;
mod user_store;

pub use credential_store::DieselCredentialStore;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use transaction_store::DieselTransactionStore;
pub use user_store::DieselUserStore;
