//! Login endpoint issuing bearer tokens.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DomainError, LoginCredentials, LoginValidationError};

use super::error::ApiError;
use super::state::HttpState;
use super::token::TokenCodec;
use super::ApiResult;

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Login response carrying the signed token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "admin")]
    pub role: String,
    pub user_id: i64,
}

fn map_login_validation_error(err: LoginValidationError) -> DomainError {
    match err {
        LoginValidationError::EmptyUsername => {
            DomainError::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username" }))
        }
        LoginValidationError::EmptyPassword => {
            DomainError::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password" }))
        }
    }
}

/// Authenticate credentials and issue a bearer token.
///
/// Failed logins never reveal whether the username exists.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    codec: web::Data<TokenCodec>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let principal = state.login.authenticate(&credentials).await?;
    let token = codec.issue(&principal)?;
    Ok(web::Json(LoginResponse {
        token,
        role: principal.role.as_str().to_owned(),
        user_id: principal.user_id,
    }))
}
