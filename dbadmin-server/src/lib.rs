//! dbadmin-server: PostgreSQL introspection, schema-driven writes, and the
//! JSON API over them
//!
//! - `db`: pool plus catalog / row / report repositories
//! - `service`: operations shared by the CLI and HTTP
//! - `http`: axum routes

pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use db::{create_pool, create_pool_with_options, DbError};
pub use http::{run_server, ServerConfig};
pub use service::{AdminService, KeySelector, WriteOutcome};
