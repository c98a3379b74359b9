//! Schema metadata model
//!
//! Plain values filled by catalog queries in dbadmin-server. Nothing here
//! talks to a database.

use serde::{Deserialize, Serialize};

/// Fallback type name when a column is not found, matching how the edit
/// form treats unknown columns as free text.
pub const DEFAULT_DATA_TYPE: &str = "text";

/// One column as reported by `information_schema.columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// SQL type name, e.g. `integer`, `character varying`, `USER-DEFINED`
    pub data_type: String,
    pub is_nullable: bool,
    /// Underlying type name, e.g. `int4`, `varchar`, or an enum name
    pub udt_name: String,
    pub character_maximum_length: Option<i32>,
    pub column_default: Option<String>,
    pub ordinal_position: i32,
}

impl ColumnInfo {
    /// Form label shown next to an input: `name (data_type)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.data_type)
    }

    /// Type used to cast bound parameters. Falls back to `data_type` when
    /// the catalog reports no udt name.
    pub fn cast_type(&self) -> &str {
        if self.udt_name.is_empty() {
            &self.data_type
        } else {
            &self.udt_name
        }
    }

    pub fn has_default(&self) -> bool {
        self.column_default.is_some()
    }
}

/// Foreign-key relationship from one column to a referenced column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// A table with its columns (ordinal order) and keys (key order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Declared type of a column, `text` when the column is unknown.
    pub fn data_type_of(&self, name: &str) -> &str {
        self.column(name)
            .map(|c| c.data_type.as_str())
            .unwrap_or(DEFAULT_DATA_TYPE)
    }

    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    pub fn is_key_column(&self, name: &str) -> bool {
        self.primary_key.iter().any(|k| k == name)
    }

    /// Columns outside the primary key, in declared order.
    pub fn non_key_columns(&self) -> Vec<&ColumnInfo> {
        self.columns
            .iter()
            .filter(|c| !self.is_key_column(&c.name))
            .collect()
    }

    /// Primary key columns in key order. Key names missing from `columns`
    /// are skipped.
    pub fn key_columns(&self) -> Vec<&ColumnInfo> {
        self.primary_key
            .iter()
            .filter_map(|k| self.column(k))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn column(name: &str, data_type: &str, udt: &str, position: i32) -> ColumnInfo {
        ColumnInfo {
            name: name.to_owned(),
            data_type: data_type.to_owned(),
            is_nullable: true,
            udt_name: udt.to_owned(),
            character_maximum_length: None,
            column_default: None,
            ordinal_position: position,
        }
    }

    /// `Equipamento`-like table keyed by `nTombamento`
    pub fn equipment() -> TableSchema {
        let mut id = column("nTombamento", "integer", "int4", 1);
        id.is_nullable = false;
        id.column_default = Some("nextval('equip_seq'::regclass)".into());
        TableSchema {
            name: "Equipamento".into(),
            columns: vec![
                id,
                column("nome", "character varying", "varchar", 2),
                column("ativo", "boolean", "bool", 3),
                column("adquiridoEm", "timestamp without time zone", "timestamp", 4),
                column("laboratórioId", "integer", "int4", 5),
            ],
            primary_key: vec!["nTombamento".into()],
            foreign_keys: vec![ForeignKey {
                column: "laboratórioId".into(),
                referenced_table: "Laboratório".into(),
                referenced_column: "id".into(),
            }],
        }
    }

    /// Composite-key table
    pub fn enrollment() -> TableSchema {
        TableSchema {
            name: "DiscenteFazAvaliação".into(),
            columns: vec![
                column("matrícula", "character varying", "varchar", 1),
                column("número", "integer", "int4", 2),
                column("nota", "numeric", "numeric", 3),
                column("data", "date", "date", 4),
            ],
            primary_key: vec!["matrícula".into(), "número".into()],
            foreign_keys: vec![],
        }
    }
}
