//! Text grid of query results

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Rows of text cells; `None` is SQL NULL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// One row as column → value.
    pub fn row_map(&self, row: usize) -> Option<BTreeMap<String, Option<String>>> {
        let cells = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_lookup() {
        let mut rs = ResultSet::new(vec!["id".into(), "nome".into()]);
        rs.rows.push(vec![Some("1".into()), None]);
        assert_eq!(rs.cell(0, "id"), Some("1"));
        assert_eq!(rs.cell(0, "nome"), None);
        assert_eq!(rs.cell(1, "id"), None);
        assert_eq!(rs.row_map(0).unwrap().get("nome"), Some(&None));
    }
}
