//! Authentication domain: credentials, roles, and password verification.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::ports::{CredentialStore, LoginService};
use crate::domain::DomainError;

/// Validation failures raised by [`LoginCredentials::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    EmptyUsername,
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Closed role set used by the authorization gate.
///
/// Credential records carry an open role string; only the exact literal
/// `"admin"` elevates. Everything else authenticates as [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Parse a role claim. Exact-match on the elevated literal.
    pub fn from_claim(raw: &str) -> Self {
        if raw == "admin" {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// Canonical lower-case label, as embedded in tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username/password pair presented at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials from raw parts.
    ///
    /// The username is trimmed; the password is taken verbatim but must not
    /// be empty.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Presented password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Identity established by a successful login, embedded in tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a password with a fresh random salt.
///
/// Stored form is `salt$hexdigest` where the digest covers the salt
/// followed by the password.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let hashed = digest(&salt, password);
    format!("{salt}${hashed}")
}

/// Verify a presented password against a stored `salt$hexdigest` value.
///
/// Malformed stored values never verify.
pub fn verify_password(stored: &str, password: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

/// [`LoginService`] implementation backed by a credential store.
#[derive(Clone)]
pub struct CredentialLoginService {
    credentials: Arc<dyn CredentialStore>,
}

impl CredentialLoginService {
    /// Create a login service over the given credential store.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl LoginService for CredentialLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, DomainError> {
        let record = self
            .credentials
            .find_by_username(credentials.username())
            .await
            .map_err(DomainError::from)?;

        // One error for both failure paths so the response never reveals
        // whether the username exists.
        let Some(record) = record else {
            return Err(DomainError::unauthorized("invalid credentials"));
        };
        if !verify_password(&record.password_hash, credentials.password()) {
            return Err(DomainError::unauthorized("invalid credentials"));
        }

        Ok(AuthenticatedUser {
            user_id: record.user_id,
            username: record.username,
            role: Role::from_claim(&record.role),
        })
    }
}
