//! Deployment configuration for the ledger backend.
//!
//! Everything configurable arrives through CLI flags or environment
//! variables and is carried in an explicit structure; nothing reads
//! ambient state after startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::inbound::http::token::AuthConfig;
use crate::outbound::persistence::PoolConfig;

/// Runtime configuration, parsed once in `main`.
#[derive(Debug, Clone, Parser)]
#[command(name = "ledger-backend", about = "Transaction ledger and risk engine")]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum connections held by the pool.
    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 10)]
    pub database_pool_size: u32,

    /// Shared secret signing bearer tokens.
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Issuer claim stamped into and required from tokens.
    #[arg(long, env = "JWT_ISSUER", default_value = "ledger-backend")]
    pub jwt_issuer: String,

    /// Audience claim stamped into and required from tokens.
    #[arg(long, env = "JWT_AUDIENCE", default_value = "ledger-clients")]
    pub jwt_audience: String,

    /// Token lifetime in minutes.
    #[arg(long, env = "JWT_EXPIRE_MINUTES", default_value_t = 60)]
    pub jwt_expire_minutes: i64,

    /// Append-only audit log file.
    #[arg(long, env = "AUDIT_LOG_PATH", default_value = "files/audit.log")]
    pub audit_log_path: PathBuf,

    /// JSON snapshot file written by import/export.
    #[arg(long, env = "SNAPSHOT_PATH", default_value = "files/transactions.json")]
    pub snapshot_path: PathBuf,
}

impl AppConfig {
    /// Token configuration slice.
    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            secret: self.jwt_secret.clone(),
            issuer: self.jwt_issuer.clone(),
            audience: self.jwt_audience.clone(),
            expiry_minutes: self.jwt_expire_minutes,
        }
    }

    /// Connection pool configuration slice.
    pub fn pool(&self) -> PoolConfig {
        PoolConfig::new(self.database_url.clone()).with_max_size(self.database_pool_size)
    }
}
