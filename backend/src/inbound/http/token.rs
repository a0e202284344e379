//! Signed bearer tokens carrying the authenticated identity.
//!
//! Tokens are HS256 JWTs embedding user id, username, and role. Signing
//! key, issuer, audience, and lifetime come from deployment configuration
//! passed in at construction; nothing here reads ambient state.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthenticatedUser, DomainError, Role};

/// Deployment configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_minutes: i64,
}

/// Claim set embedded in issued tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    role: String,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies the bearer tokens protecting the ledger.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    expiry: Duration,
}

impl TokenCodec {
    /// Build a codec from deployment configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiry: Duration::minutes(config.expiry_minutes),
        }
    }

    /// Issue a token for the principal, valid from now.
    pub fn issue(&self, principal: &AuthenticatedUser) -> Result<String, DomainError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a token with an explicit issue instant.
    ///
    /// Exposed for tests that need already-expired tokens.
    pub fn issue_at(
        &self,
        principal: &AuthenticatedUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let claims = Claims {
            sub: principal.user_id.to_string(),
            name: principal.username.clone(),
            role: principal.role.as_str().to_owned(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.expiry).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| DomainError::internal(format!("failed to sign token: {err}")))
    }

    /// Verify a presented token and recover the principal.
    ///
    /// Signature, issuer, audience, and expiry failures all collapse into
    /// one Unauthorized error; the caller learns nothing about which check
    /// failed.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| DomainError::unauthorized("invalid or expired token"))?;
        let user_id: i64 = data
            .claims
            .sub
            .parse()
            .map_err(|_| DomainError::unauthorized("invalid or expired token"))?;
        Ok(AuthenticatedUser {
            user_id,
            username: data.claims.name,
            role: Role::from_claim(&data.claims.role),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    fn config() -> AuthConfig {
        AuthConfig {
            secret: "test-secret-at-least-32-bytes-long".into(),
            issuer: "ledger-backend".into(),
            audience: "ledger-clients".into(),
            expiry_minutes: 60,
        }
    }

    fn principal(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 7,
            username: "ada".into(),
            role,
        }
    }

    #[test]
    fn issued_tokens_verify_and_round_trip_the_principal() {
        let codec = TokenCodec::new(&config());
        let token = codec.issue(&principal(Role::Admin)).expect("issue");
        let verified = codec.verify(&token).expect("verify");
        assert_eq!(verified, principal(Role::Admin));
    }

    #[test]
    fn expired_tokens_are_unauthorized() {
        let codec = TokenCodec::new(&config());
        let stale = Utc::now() - Duration::minutes(120);
        let token = codec
            .issue_at(&principal(Role::User), stale)
            .expect("issue");
        let error = codec.verify(&token).expect_err("expired");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let codec = TokenCodec::new(&config());
        let other = TokenCodec::new(&AuthConfig {
            secret: "a-completely-different-signing-secret".into(),
            ..config()
        });
        let token = other.issue(&principal(Role::Admin)).expect("issue");
        let error = codec.verify(&token).expect_err("bad signature");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn tokens_for_another_audience_are_rejected() {
        let codec = TokenCodec::new(&config());
        let other = TokenCodec::new(&AuthConfig {
            audience: "someone-else".into(),
            ..config()
        });
        let token = other.issue(&principal(Role::Admin)).expect("issue");
        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_unauthorized() {
        let codec = TokenCodec::new(&config());
        let error = codec.verify("not.a.token").expect_err("garbage");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
