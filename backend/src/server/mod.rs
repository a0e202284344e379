//! HTTP app assembly and route registration.

pub mod config;

use actix_web::web;

use crate::inbound::http::{auth, transactions, users};

pub use config::AppConfig;

/// Register every `/api` route.
///
/// Literal transaction paths (`by-user`, `risk`, `stats`, `import-json`,
/// `export-json`) are registered ahead of the `{id}` routes so they win
/// resolution.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(auth::login)
            .service(users::list_users)
            .service(users::create_user)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(transactions::list_by_user)
            .service(transactions::monthly_risk)
            .service(transactions::monthly_stats)
            .service(transactions::import_json)
            .service(transactions::export_json)
            .service(transactions::create_transaction)
            .service(transactions::get_transaction)
            .service(transactions::update_transaction)
            .service(transactions::delete_transaction),
    );
}
