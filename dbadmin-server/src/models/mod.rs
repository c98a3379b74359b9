//! Request models with validation at construction
//!
//! Invalid input returns ValidationError, not panic.

pub mod table_name;
pub mod validation;

pub use table_name::TableName;
pub use validation::ValidationError;
