//! Table name validation
//!
//! Names are checked before they reach the catalog; whether the table
//! exists is the catalog's call.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// PostgreSQL truncates identifiers past NAMEDATALEN - 1 bytes
const MAX_TABLE_NAME_LEN: usize = 63;

/// Any printable text; control characters never occur in catalog names
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\x00-\x1F\x7F]+$").expect("invalid table name regex"));

/// Validated table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Create a table name.
    ///
    /// # Example
    /// ```
    /// use dbadmin_server::models::TableName;
    ///
    /// assert!(TableName::new("DocenteResponsávelPorLaboratório").is_ok());
    /// assert!(TableName::new("").is_err());
    /// assert!(TableName::new("bad\nname").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "table name" });
        }

        if s.len() > MAX_TABLE_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "table name",
                max: MAX_TABLE_NAME_LEN,
            });
        }

        if !NAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "table name",
                reason: "must not contain control characters",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_case_and_accents() {
        assert!(TableName::new("Equipamento").is_ok());
        assert!(TableName::new("Avaliação").is_ok());
        assert!(TableName::new("with space").is_ok());
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            TableName::new(&long),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(TableName::new(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn rejects_control_chars() {
        assert!(TableName::new("a\0b").is_err());
        assert!(TableName::new("tab\there").is_err());
    }
}
