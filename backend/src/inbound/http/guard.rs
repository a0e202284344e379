//! Bearer-token request guard.
//!
//! [`AuthContext`] is the authorization gate in extractor form: any handler
//! taking it as an argument requires a valid, unexpired token. Handlers for
//! mutating endpoints additionally call [`AuthContext::require_admin`].

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::domain::{AuthenticatedUser, DomainError, Role};

use super::error::ApiError;
use super::token::TokenCodec;

/// Authenticated identity extracted from the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    principal: AuthenticatedUser,
}

impl AuthContext {
    /// The verified principal.
    pub fn principal(&self) -> &AuthenticatedUser {
        &self.principal
    }

    /// Require the elevated role, or fail with Forbidden.
    ///
    /// Forbidden is distinct from Unauthorized: the token was valid, the
    /// role was not sufficient.
    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.principal.role == Role::Admin {
            Ok(())
        } else {
            Err(DomainError::forbidden("administrator role required"))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, DomainError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| DomainError::unauthorized("missing bearer token"))?;
    let raw = header
        .to_str()
        .map_err(|_| DomainError::unauthorized("missing bearer token"))?;
    match raw.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token.trim()),
        _ => Err(DomainError::unauthorized("missing bearer token")),
    }
}

fn extract(req: &HttpRequest) -> Result<AuthContext, ApiError> {
    let codec = req
        .app_data::<web::Data<TokenCodec>>()
        .ok_or_else(|| ApiError::from(DomainError::internal("token codec not configured")))?;
    let token = bearer_token(req)?;
    let principal = codec.verify(token)?;
    Ok(AuthContext { principal })
}

impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
