//! Repository implementations for database access
//!
//! Each repository borrows the pool and is scoped to one schema:
//! - catalog: tables, columns, keys from pg_catalog / information_schema
//! - rows: sampling, key lookup, and transactional writes
//! - reports: fixed parameterized queries

mod bind;
pub mod catalog;
pub mod reports;
pub mod rows;

pub use catalog::{CatalogRepo, DbError, TableForeignKey};
pub use reports::ReportRunner;
pub use rows::RowRepo;
