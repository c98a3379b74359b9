//! Structured error types for dbadmin-core.
//!
//! Uses `thiserror` so the server and CLI can match on the failure kind.
//! The binary crate (dbadmin-cli) still wraps these in `anyhow` for context.

use thiserror::Error;

/// Main error type for dbadmin-core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// User text could not be coerced to the column's type
    #[error("Invalid value '{value}' for column '{column}' ({data_type}): {reason}")]
    InvalidValue {
        column: String,
        data_type: String,
        value: String,
        reason: String,
    },

    /// Input names a column the table does not declare
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Update requested on a table without a primary key
    #[error("Table '{table}' has no primary key; rows cannot be identified for update")]
    MissingPrimaryKey { table: String },

    /// Every column is part of the key, so SET would be empty
    #[error("Table '{table}' has no non-key columns to update")]
    NothingToUpdate { table: String },

    /// Input tried to change a primary key column during update
    #[error("Primary key column '{column}' cannot be edited")]
    KeyColumnNotEditable { column: String },

    /// Row key is missing a value or names a non-key column
    #[error("Invalid row key for table '{table}': {reason}")]
    InvalidRowKey { table: String, reason: String },

    /// No row carries the requested key label
    #[error("No row with key '{label}' in table '{table}'")]
    RowNotFound { table: String, label: String },

    /// Report id is not in the catalog
    #[error("Unknown report '{id}'")]
    UnknownReport { id: String },

    /// `column=value` argument could not be split
    #[error("Invalid assignment '{input}': expected column=value")]
    InvalidAssignment { input: String },
}

/// Result type alias for dbadmin-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an invalid value error
    pub fn invalid_value(
        column: impl Into<String>,
        data_type: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            column: column.into(),
            data_type: data_type.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown column error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an invalid row key error
    pub fn invalid_row_key(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRowKey {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_value("age", "integer", "abc", "not an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' for column 'age' (integer): not an integer"
        );

        let err = CoreError::MissingPrimaryKey {
            table: "logs".into(),
        };
        assert!(err.to_string().contains("no primary key"));
    }
}
