//! Transaction ledger and risk engine backend.
//!
//! Hexagonal layout: `domain` holds entities, calculators and ports;
//! `inbound::http` is the REST adapter; `outbound` implements the driven
//! ports over PostgreSQL and the filesystem; `server` assembles the app.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::trace::Trace;
