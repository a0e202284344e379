//! HTTP inbound adapter exposing the ledger's REST endpoints.

pub mod auth;
pub mod error;
pub mod guard;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token;
pub mod transactions;
pub mod users;

use serde::Serialize;
use utoipa::ToSchema;

pub use error::{ApiError, ApiResult};

/// Body returned by create endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    /// Store-assigned identifier of the new entity.
    pub id: i64,
}
