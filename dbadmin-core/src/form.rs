//! Schema-driven form description
//!
//! One text field per column, labelled `name (type)`. Insert forms start
//! blank; edit forms are prefilled from the selected row and lock the key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Insert,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub data_type: String,
    pub nullable: bool,
    pub has_default: bool,
    /// Current text; empty means NULL on submit
    pub value: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    pub table: String,
    pub mode: FormMode,
    /// Key label of the row being edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub fields: Vec<FormField>,
}

/// Blank form with every column editable.
pub fn insert_form(schema: &TableSchema) -> Form {
    let fields = schema
        .columns
        .iter()
        .map(|c| FormField {
            name: c.name.clone(),
            label: c.label(),
            data_type: c.data_type.clone(),
            nullable: c.is_nullable,
            has_default: c.has_default(),
            value: String::new(),
            read_only: false,
        })
        .collect();

    Form {
        table: schema.name.clone(),
        mode: FormMode::Insert,
        key: None,
        fields,
    }
}

/// Form prefilled from `row`; NULL cells show as empty, key columns are
/// read-only.
pub fn edit_form(schema: &TableSchema, key_label: &str, row: &BTreeMap<String, Option<String>>) -> Form {
    let fields = schema
        .columns
        .iter()
        .map(|c| FormField {
            name: c.name.clone(),
            label: c.label(),
            data_type: c.data_type.clone(),
            nullable: c.is_nullable,
            has_default: c.has_default(),
            value: row.get(&c.name).cloned().flatten().unwrap_or_default(),
            read_only: schema.is_key_column(&c.name),
        })
        .collect();

    Form {
        table: schema.name.clone(),
        mode: FormMode::Edit,
        key: Some(key_label.to_owned()),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::equipment;

    #[test]
    fn insert_form_is_blank() {
        let form = insert_form(&equipment());
        assert_eq!(form.fields.len(), 5);
        assert!(form.fields.iter().all(|f| f.value.is_empty() && !f.read_only));
        assert_eq!(form.fields[0].label, "nTombamento (integer)");
        assert!(form.fields[0].has_default);
    }

    #[test]
    fn edit_form_prefills_and_locks_key() {
        let row: BTreeMap<String, Option<String>> = [
            ("nTombamento".to_string(), Some("12".to_string())),
            ("nome".to_string(), Some("Microscópio".to_string())),
            ("ativo".to_string(), None),
        ]
        .into_iter()
        .collect();

        let form = edit_form(&equipment(), "12", &row);
        assert_eq!(form.mode, FormMode::Edit);
        assert_eq!(form.key.as_deref(), Some("12"));
        assert!(form.fields[0].read_only);
        assert_eq!(form.fields[1].value, "Microscópio");
        assert!(!form.fields[1].read_only);
        assert_eq!(form.fields[2].value, "");
    }
}
