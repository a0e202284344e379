//! Port abstraction for credential lookup.

use async_trait::async_trait;

use super::StoreError;

/// A stored credential record linking a username to a user profile and
/// role.
///
/// The role is an open string at this layer; it is parsed into the closed
/// [`crate::domain::Role`] set at the authentication boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub user_id: i64,
    pub username: String,
    /// Salted one-way hash in `salt$hexdigest` form.
    pub password_hash: String,
    pub role: String,
}

/// Read-only lookup of credential records, consulted only during login.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the credential record for a username, if any.
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;
}
