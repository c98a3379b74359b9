//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - Catalog values are always bound, never interpolated
//! - Generated DML comes from dbadmin-core with quoted identifiers
//! - Writes run in a transaction and roll back on any database error

pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
