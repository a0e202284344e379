//! Backend entry-point: wires configuration, migrations, stores, and the
//! REST surface.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::{AuditSink, CredentialStore, TransactionStore, UserStore};
use backend::domain::CredentialLoginService;
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::token::TokenCodec;
use backend::outbound::audit::FileAuditSink;
use backend::outbound::persistence::{
    DbPool, DieselCredentialStore, DieselTransactionStore, DieselUserStore,
};
use backend::server::{routes, AppConfig};
use backend::Trace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn run_migrations(database_url: &str) -> Result<()> {
    let mut conn = PgConnection::establish(database_url)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| eyre!("failed to run migrations: {err}"))?;
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::parse();

    let database_url = config.database_url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&database_url)).await??;

    let pool = DbPool::new(config.pool()).await?;

    let audit = FileAuditSink::new(&config.audit_log_path, &config.snapshot_path);
    audit.ensure_files().await?;

    let users: Arc<dyn UserStore> = Arc::new(DieselUserStore::new(pool.clone()));
    let transactions: Arc<dyn TransactionStore> =
        Arc::new(DieselTransactionStore::new(pool.clone()));
    let credentials: Arc<dyn CredentialStore> = Arc::new(DieselCredentialStore::new(pool));
    let audit: Arc<dyn AuditSink> = Arc::new(audit);

    let state = web::Data::new(HttpState::new(
        users,
        transactions,
        Arc::new(CredentialLoginService::new(credentials)),
        audit,
    ));
    let codec = web::Data::new(TokenCodec::new(&config.auth()));
    let health_state = web::Data::new(HealthState::new());

    let server_state = state.clone();
    let server_codec = codec.clone();
    let server_health = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_state.clone())
            .app_data(server_codec.clone())
            .app_data(server_health.clone())
            .wrap(Trace)
            .configure(routes)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?;

    info!(addr = %config.bind_addr, "ledger backend listening");
    health_state.mark_ready();
    server.run().await?;
    Ok(())
}
