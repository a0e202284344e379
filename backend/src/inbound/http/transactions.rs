//! Transaction endpoints: CRUD, window listing, risk, monthly stats, and
//! the JSON import/export round trips.
//!
//! Reads require a valid token; mutations (including bulk import) require
//! the admin role. Every successful mutation emits one audit line.

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AuditEvent, DomainError, MonthlyBreakdownRow, NewTransaction, RiskReport, Transaction,
    TransactionPatch, TransactionValidationError,
};

use super::error::ApiError;
use super::guard::AuthContext;
use super::state::HttpState;
use super::{ApiResult, CreatedResponse};

/// Create request body for `POST /api/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub user_id: i64,
    pub operator: String,
    /// DEPOSIT, WITHDRAWAL or OTHER; matched case-insensitively.
    pub kind: String,
    #[schema(value_type = String, example = "120.50")]
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_label: Option<String>,
}

impl TryFrom<CreateTransactionRequest> for NewTransaction {
    type Error = TransactionValidationError;

    fn try_from(value: CreateTransactionRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.user_id,
            value.operator,
            &value.kind,
            value.amount,
            value.occurred_at,
            value.raw_label,
        )
    }
}

/// Partial update body for `PUT /api/transactions/{id}`. Omitted fields
/// keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub operator: Option<String>,
    pub kind: Option<String>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub raw_label: Option<String>,
}

/// Optional half-open occurrence window for transaction listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct WindowQuery {
    /// Inclusive lower bound on occurred-at.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on occurred-at.
    pub to: Option<DateTime<Utc>>,
}

/// Optional year selector for the monthly breakdown.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct YearQuery {
    /// Calendar year; defaults to the current UTC year.
    pub year: Option<i32>,
}

/// Body returned by the bulk import endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    /// Number of transactions inserted.
    pub inserted: usize,
}

fn map_transaction_validation_error(err: TransactionValidationError) -> DomainError {
    let field = match err {
        TransactionValidationError::InvalidUserId => "userId",
        TransactionValidationError::EmptyOperator => "operator",
        TransactionValidationError::EmptyKind | TransactionValidationError::UnknownKind => "kind",
        TransactionValidationError::NegativeAmount => "amount",
        TransactionValidationError::ZeroTimestamp => "occurredAt",
    };
    DomainError::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn patch_from(body: UpdateTransactionRequest) -> Result<TransactionPatch, DomainError> {
    TransactionPatch::new(
        body.operator,
        body.kind,
        body.amount,
        body.occurred_at,
        body.raw_label,
    )
    .map_err(map_transaction_validation_error)
}

/// List a user's transactions, newest first, optionally windowed.
#[utoipa::path(
    get,
    path = "/api/transactions/by-user/{user_id}",
    params(
        ("user_id" = i64, Path, description = "Owning user profile id"),
        WindowQuery
    ),
    responses(
        (status = 200, description = "Transactions", body = [Transaction]),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "listTransactionsByUser"
)]
#[get("/transactions/by-user/{user_id}")]
pub async fn list_by_user(
    _auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    window: web::Query<WindowQuery>,
) -> ApiResult<web::Json<Vec<Transaction>>> {
    let user_id = path.into_inner();
    let window = window.into_inner();
    let transactions = state
        .transactions
        .list_by_user(user_id, window.from, window.to)
        .await?;
    Ok(web::Json(transactions))
}

/// Fetch one transaction.
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction", body = Transaction),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Unknown transaction", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "getTransaction"
)]
#[get("/transactions/{id}")]
pub async fn get_transaction(
    _auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Transaction>> {
    let id = path.into_inner();
    let transaction = state
        .transactions
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("transaction not found"))?;
    Ok(web::Json(transaction))
}

/// Create a transaction. Admin only.
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "createTransaction"
)]
#[post("/transactions")]
pub async fn create_transaction(
    auth: AuthContext,
    state: web::Data<HttpState>,
    payload: web::Json<CreateTransactionRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;
    let draft = NewTransaction::try_from(payload.into_inner())
        .map_err(map_transaction_validation_error)?;
    let id = state.transactions.create(&draft).await?;
    state
        .record_audit(AuditEvent::TransactionCreated {
            id,
            user_id: draft.user_id(),
            amount: draft.amount(),
        })
        .await;
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// Partially update a transaction. Admin only.
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    params(("id" = i64, Path, description = "Transaction id")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Unknown transaction", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "updateTransaction"
)]
#[put("/transactions/{id}")]
pub async fn update_transaction(
    auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateTransactionRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;
    let id = path.into_inner();
    let patch = patch_from(payload.into_inner())?;
    let updated = state.transactions.update(id, &patch).await?;
    if !updated {
        return Err(DomainError::not_found("transaction not found").into());
    }
    state
        .record_audit(AuditEvent::TransactionUpdated { id })
        .await;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a transaction. Admin only; idempotent on repeat.
#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Unknown transaction", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "deleteTransaction"
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;
    let id = path.into_inner();
    let deleted = state.transactions.delete(id).await?;
    if !deleted {
        return Err(DomainError::not_found("transaction not found").into());
    }
    state
        .record_audit(AuditEvent::TransactionDeleted { id })
        .await;
    Ok(HttpResponse::NoContent().finish())
}

/// Bulk-import transactions from a JSON array. Admin only.
///
/// Items are validated and inserted sequentially; the first invalid item
/// aborts the run with its index, leaving earlier inserts in place (single
/// entity atomicity only, as everywhere else).
#[utoipa::path(
    post,
    path = "/api/transactions/import-json",
    request_body = [CreateTransactionRequest],
    responses(
        (status = 200, description = "Import summary", body = ImportResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "importTransactions"
)]
#[post("/transactions/import-json")]
pub async fn import_json(
    auth: AuthContext,
    state: web::Data<HttpState>,
    payload: web::Json<Vec<CreateTransactionRequest>>,
) -> ApiResult<web::Json<ImportResponse>> {
    auth.require_admin()?;
    let items = payload.into_inner();
    if items.is_empty() {
        return Err(DomainError::invalid_request("payload must not be empty").into());
    }

    let mut inserted = 0;
    for (index, item) in items.iter().enumerate() {
        let draft = NewTransaction::try_from(item.clone()).map_err(|err| {
            DomainError::invalid_request(format!("item {}: {err}", index + 1))
        })?;
        state.transactions.create(&draft).await?;
        inserted += 1;
    }

    match serde_json::to_value(&items) {
        Ok(snapshot) => state.write_snapshot(&snapshot).await,
        Err(error) => tracing::warn!(%error, "import snapshot serialization failed"),
    }
    state
        .record_audit(AuditEvent::TransactionsImported { count: inserted })
        .await;
    Ok(web::Json(ImportResponse { inserted }))
}

/// Export a user's full ledger, writing a JSON snapshot as a side effect.
#[utoipa::path(
    get,
    path = "/api/transactions/export-json/{user_id}",
    params(("user_id" = i64, Path, description = "Owning user profile id")),
    responses(
        (status = 200, description = "Transactions", body = [Transaction]),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "exportTransactions"
)]
#[get("/transactions/export-json/{user_id}")]
pub async fn export_json(
    _auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<Transaction>>> {
    let user_id = path.into_inner();
    let transactions = state.transactions.list_by_user(user_id, None, None).await?;

    match serde_json::to_value(&transactions) {
        Ok(snapshot) => state.write_snapshot(&snapshot).await,
        Err(error) => tracing::warn!(%error, "export snapshot serialization failed"),
    }
    state
        .record_audit(AuditEvent::TransactionsExported {
            user_id,
            count: transactions.len(),
        })
        .await;
    Ok(web::Json(transactions))
}

/// Monthly spend-to-income risk indicator.
#[utoipa::path(
    get,
    path = "/api/transactions/risk/{user_id}/{year}/{month}",
    params(
        ("user_id" = i64, Path, description = "User profile id"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Calendar month, 1-12")
    ),
    responses(
        (status = 200, description = "Risk report", body = RiskReport),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Unknown user", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "monthlyRisk"
)]
#[get("/transactions/risk/{user_id}/{year}/{month}")]
pub async fn monthly_risk(
    _auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i32, u32)>,
) -> ApiResult<web::Json<RiskReport>> {
    let (user_id, year, month) = path.into_inner();
    let report = state.risk.monthly_report(user_id, year, month).await?;
    Ok(web::Json(report))
}

/// Monthly deposit/withdrawal aggregates for one calendar year.
#[utoipa::path(
    get,
    path = "/api/transactions/stats/monthly/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User profile id"),
        YearQuery
    ),
    responses(
        (status = 200, description = "Sparse monthly series", body = [MonthlyBreakdownRow]),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["transactions"],
    operation_id = "monthlyStats"
)]
#[get("/transactions/stats/monthly/{user_id}")]
pub async fn monthly_stats(
    _auth: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<YearQuery>,
) -> ApiResult<web::Json<Vec<MonthlyBreakdownRow>>> {
    let user_id = path.into_inner();
    let year = query.into_inner().year.unwrap_or_else(|| Utc::now().year());
    let rows = state.stats.monthly_breakdown(user_id, year).await?;
    Ok(web::Json(rows))
}
