//! dbadmin-core: schema-driven SQL building with no I/O
//!
//! Column metadata in, parameterized statements and display text out.

pub mod config;
pub mod error;
pub mod form;
pub mod graph;
pub mod ident;
pub mod render;
pub mod report;
pub mod resultset;
pub mod rowkey;
pub mod schema;
pub mod statement;
pub mod value;
pub mod write;

pub use config::DbAdminConfig;
pub use error::{CoreError, Result};
pub use form::{Form, FormField, FormMode};
pub use graph::relationship_graph;
pub use report::{Report, ReportCatalog};
pub use resultset::ResultSet;
pub use rowkey::RowKey;
pub use schema::{ColumnInfo, ForeignKey, TableSchema};
pub use statement::{build_insert, build_update, Statement, TableRef};
pub use value::{parse_input_value, SqlType, SqlValue};
pub use write::{plan_insert, plan_update, BoundStatement, FormInput, InsertOptions};
