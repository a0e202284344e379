//! OpenAPI documentation configuration.
//!
//! Aggregates every HTTP endpoint and the wire schemas into one document,
//! served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the ledger API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ledger backend API",
        description = "Transaction ledger with risk and monthly aggregates."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::transactions::list_by_user,
        crate::inbound::http::transactions::get_transaction,
        crate::inbound::http::transactions::create_transaction,
        crate::inbound::http::transactions::update_transaction,
        crate::inbound::http::transactions::delete_transaction,
        crate::inbound::http::transactions::import_json,
        crate::inbound::http::transactions::export_json,
        crate::inbound::http::transactions::monthly_risk,
        crate::inbound::http::transactions::monthly_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::inbound::http::ApiError,
        crate::inbound::http::CreatedResponse,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::auth::LoginResponse,
        crate::inbound::http::users::CreateUserRequest,
        crate::inbound::http::users::UpdateUserRequest,
        crate::inbound::http::transactions::CreateTransactionRequest,
        crate::inbound::http::transactions::UpdateTransactionRequest,
        crate::inbound::http::transactions::ImportResponse,
        crate::domain::UserProfile,
        crate::domain::Transaction,
        crate::domain::TransactionKind,
        crate::domain::RiskReport,
        crate::domain::MonthlyBreakdownRow,
        crate::domain::ErrorCode,
    ))
)]
pub struct ApiDoc;
