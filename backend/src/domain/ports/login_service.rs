//! Driving port for the login use-case.
//!
//! Inbound adapters call this to authenticate credentials without knowing
//! the backing infrastructure, which keeps HTTP handler tests deterministic
//! behind a test double.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, DomainError, LoginCredentials};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated principal.
    ///
    /// An unknown username and a wrong password are indistinguishable to
    /// the caller.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, DomainError>;
}
