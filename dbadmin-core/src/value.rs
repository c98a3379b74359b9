//! Coercion of form text into typed SQL values
//!
//! The column's reported `data_type` picks a class from a short lookup
//! table; the class decides how the text is parsed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Value class derived from a reported SQL type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Numeric,
    Boolean,
    Timestamp,
    Date,
    Text,
}

impl SqlType {
    /// Classify a type name by case-insensitive substring, first match wins.
    pub fn classify(data_type: &str) -> Self {
        let t = data_type.to_lowercase();
        if ["integer", "smallint", "bigint"].iter().any(|k| t.contains(k)) {
            Self::Integer
        } else if ["numeric", "decimal", "real", "double"]
            .iter()
            .any(|k| t.contains(k))
        {
            Self::Numeric
        } else if t.contains("boolean") {
            Self::Boolean
        } else if t.contains("timestamp") {
            Self::Timestamp
        } else if t.contains("date") {
            Self::Date
        } else {
            Self::Text
        }
    }
}

/// A coerced value ready to bind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Numeric(f64),
    Boolean(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text as the database printed it, bound without coercion.
    pub fn stored(text: Option<&str>) -> Self {
        match text {
            Some(t) => Self::Text(t.to_owned()),
            None => Self::Null,
        }
    }
}

const TRUTHY: [&str; 4] = ["true", "1", "t", "yes"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Offset-carrying layouts, including PostgreSQL's `::text` output (`+00`).
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Convert user text into a value for a column of type `data_type`.
///
/// Blank input is NULL for every type. `column` is only used in errors.
pub fn parse_input_value(column: &str, input: &str, data_type: &str) -> Result<SqlValue> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(SqlValue::Null);
    }

    let invalid = |reason: &str| CoreError::invalid_value(column, data_type, input, reason);

    match SqlType::classify(data_type) {
        SqlType::Integer => trimmed
            .parse::<i64>()
            .map(SqlValue::Integer)
            .map_err(|_| invalid("not an integer")),
        SqlType::Numeric => match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(SqlValue::Numeric(n)),
            _ => Err(invalid("not a finite number")),
        },
        SqlType::Boolean => {
            let lowered = trimmed.to_lowercase();
            Ok(SqlValue::Boolean(TRUTHY.contains(&lowered.as_str())))
        }
        SqlType::Timestamp => parse_timestamp(trimmed)
            .map(SqlValue::Timestamp)
            .ok_or_else(|| invalid("unrecognized date/time")),
        SqlType::Date => parse_date(trimmed)
            .map(SqlValue::Date)
            .ok_or_else(|| invalid("unrecognized date")),
        SqlType::Text => Ok(SqlValue::Text(input.to_owned())),
    }
}

/// Parse a timestamp, normalizing offset-carrying input to UTC.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc).naive_utc());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a date; timestamp-shaped input is truncated to its date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|dt| dt.date()))
}
