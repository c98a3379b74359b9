//! Primary-key row identification
//!
//! Rows offered for editing are identified by their key values joined with
//! `" / "`. A key can also be given directly as `column=value` pairs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::resultset::ResultSet;
use crate::schema::TableSchema;

pub const LABEL_SEPARATOR: &str = " / ";

/// Rendering of a NULL key cell inside a label
const NULL_LABEL: &str = "NULL";

/// Ordered primary-key values of one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowKey {
    parts: Vec<(String, Option<String>)>,
}

impl RowKey {
    /// Key of row `row` in a result set holding every key column.
    pub fn from_row(
        table: &str,
        rows: &ResultSet,
        row: usize,
        primary_key: &[String],
    ) -> Result<Self> {
        let cells = rows
            .rows
            .get(row)
            .ok_or_else(|| CoreError::invalid_row_key(table, format!("row {} out of range", row)))?;

        let parts = primary_key
            .iter()
            .map(|k| {
                let idx = rows.column_index(k).ok_or_else(|| {
                    CoreError::invalid_row_key(table, format!("result has no key column '{}'", k))
                })?;
                Ok((k.clone(), cells[idx].clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { parts })
    }

    /// Key from explicit `column → value` pairs; every key column is
    /// required and nothing else is accepted.
    pub fn from_pairs(schema: &TableSchema, pairs: &BTreeMap<String, String>) -> Result<Self> {
        if !schema.has_primary_key() {
            return Err(CoreError::MissingPrimaryKey {
                table: schema.name.clone(),
            });
        }
        if let Some(extra) = pairs.keys().find(|k| !schema.is_key_column(k)) {
            return Err(CoreError::invalid_row_key(
                &schema.name,
                format!("'{}' is not a primary key column", extra),
            ));
        }

        let parts = schema
            .primary_key
            .iter()
            .map(|k| match pairs.get(k) {
                Some(v) => Ok((k.clone(), Some(v.clone()))),
                None => Err(CoreError::invalid_row_key(
                    &schema.name,
                    format!("missing value for key column '{}'", k),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { parts })
    }

    /// Display label: key values joined with `" / "`.
    pub fn label(&self) -> String {
        self.parts
            .iter()
            .map(|(_, v)| v.as_deref().unwrap_or(NULL_LABEL))
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    }

    /// `Some(value)` when `column` is part of the key.
    pub fn value_of(&self, column: &str) -> Option<Option<&str>> {
        self.parts
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_deref())
    }

    pub fn parts(&self) -> &[(String, Option<String>)] {
        &self.parts
    }
}

/// Selectable rows: label → row index, in result order. A repeated label
/// keeps its first row.
pub fn index_by_label(
    table: &str,
    rows: &ResultSet,
    primary_key: &[String],
) -> Result<Vec<(String, usize)>> {
    let mut out: Vec<(String, usize)> = Vec::with_capacity(rows.len());
    for i in 0..rows.len() {
        let label = RowKey::from_row(table, rows, i, primary_key)?.label();
        if !out.iter().any(|(l, _)| *l == label) {
            out.push((label, i));
        }
    }
    Ok(out)
}

/// Resolve a label against loaded rows.
pub fn find_by_label(
    table: &str,
    rows: &ResultSet,
    primary_key: &[String],
    label: &str,
) -> Result<RowKey> {
    let index = index_by_label(table, rows, primary_key)?;
    let row = index
        .iter()
        .find(|(l, _)| l == label)
        .map(|(_, i)| *i)
        .ok_or_else(|| CoreError::RowNotFound {
            table: table.to_owned(),
            label: label.to_owned(),
        })?;
    RowKey::from_row(table, rows, row, primary_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::enrollment;

    fn rows() -> ResultSet {
        ResultSet {
            columns: vec!["matrícula".into(), "número".into(), "nota".into()],
            rows: vec![
                vec![Some("2020".into()), Some("1".into()), Some("8".into())],
                vec![Some("2020".into()), Some("2".into()), None],
                vec![Some("2021".into()), Some("1".into()), Some("6".into())],
            ],
        }
    }

    fn pk() -> Vec<String> {
        vec!["matrícula".into(), "número".into()]
    }

    #[test]
    fn label_joins_key_values() {
        let key = RowKey::from_row("t", &rows(), 1, &pk()).unwrap();
        assert_eq!(key.label(), "2020 / 2");
        assert_eq!(key.value_of("número"), Some(Some("2")));
        assert_eq!(key.value_of("nota"), None);
    }

    #[test]
    fn index_keeps_result_order() {
        let labels: Vec<_> = index_by_label("t", &rows(), &pk())
            .unwrap()
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(labels, ["2020 / 1", "2020 / 2", "2021 / 1"]);
    }

    #[test]
    fn find_by_label_resolves_row() {
        let key = find_by_label("t", &rows(), &pk(), "2021 / 1").unwrap();
        assert_eq!(key.value_of("matrícula"), Some(Some("2021")));

        let err = find_by_label("t", &rows(), &pk(), "9 / 9").unwrap_err();
        assert!(matches!(err, CoreError::RowNotFound { .. }));
    }

    #[test]
    fn missing_key_column_in_result() {
        let err = RowKey::from_row("t", &rows(), 0, &["id".to_string()]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRowKey { .. }));
    }

    #[test]
    fn pairs_must_cover_exactly_the_key() {
        let t = enrollment();
        let mut pairs = BTreeMap::new();
        pairs.insert("matrícula".to_string(), "2020".to_string());
        assert!(RowKey::from_pairs(&t, &pairs).is_err());

        pairs.insert("número".to_string(), "4".to_string());
        let key = RowKey::from_pairs(&t, &pairs).unwrap();
        assert_eq!(key.label(), "2020 / 4");

        pairs.insert("nota".to_string(), "1".to_string());
        assert!(RowKey::from_pairs(&t, &pairs).is_err());
    }
}
