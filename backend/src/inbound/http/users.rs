//! User profile endpoints.
//!
//! Reads require a valid token; mutations additionally require the admin
//! role and emit one audit line each on success.

use actix_web::{delete, get, post, put, web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuditEvent, DomainError, NewUserProfile, UserPatch, UserProfile, UserValidationError,
};

use super::error::ApiError;
use super::guard::AuthContext;
use super::state::HttpState;
use super::{ApiResult, CreatedResponse};

/// Create request body for `POST /api/users`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "4500.00")]
    pub monthly_income: Decimal,
}

/// Partial update body for `PUT /api/users/{id}`. Omitted fields keep their
/// stored value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Option<String>)]
    pub monthly_income: Option<Decimal>,
}

fn map_user_validation_error(err: UserValidationError) -> DomainError {
    let field = match err {
        UserValidationError::EmptyName => "name",
        UserValidationError::EmptyEmail => "email",
        UserValidationError::NegativeIncome => "monthlyIncome",
    };
    DomainError::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// List user profiles, most recently created first.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "User profiles", body = [UserProfile]),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    _auth: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let users = state.users.list().await?;
    Ok(web::Json(users))
}

/// Fetch one user profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User profile id")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Unknown user", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    _auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserProfile>> {
    let id = path.into_inner();
    let user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("user not found"))?;
    Ok(web::Json(user))
}

/// Create a user profile. Admin only.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    auth: AuthContext,
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;
    let body = payload.into_inner();
    let draft = NewUserProfile::new(body.name, body.email, body.monthly_income)
        .map_err(map_user_validation_error)?;
    let id = state.users.create(&draft).await?;
    state
        .record_audit(AuditEvent::UserCreated {
            id,
            email: draft.email().to_owned(),
        })
        .await;
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// Partially update a user profile. Admin only.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User profile id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Unknown user", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;
    let id = path.into_inner();
    let body = payload.into_inner();
    let patch = UserPatch::new(body.name, body.email, body.monthly_income)
        .map_err(map_user_validation_error)?;
    let updated = state.users.update(id, &patch).await?;
    if !updated {
        return Err(DomainError::not_found("user not found").into());
    }
    state.record_audit(AuditEvent::UserUpdated { id }).await;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a user profile. Admin only; idempotent on repeat.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User profile id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Unknown user", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;
    let id = path.into_inner();
    let deleted = state.users.delete(id).await?;
    if !deleted {
        return Err(DomainError::not_found("user not found").into());
    }
    state.record_audit(AuditEvent::UserDeleted { id }).await;
    Ok(HttpResponse::NoContent().finish())
}
