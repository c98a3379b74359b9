//! Write plans: form input → coerced values → bound statement
//!
//! A plan is pure data. dbadmin-server binds `params` in order and runs
//! `sql` inside a transaction.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::rowkey::RowKey;
use crate::schema::{ColumnInfo, TableSchema};
use crate::statement::{build_insert, build_update, TableRef};
use crate::value::{parse_input_value, SqlValue};

/// Raw form input: column name → typed-in text
pub type FormInput = BTreeMap<String, String>;

/// A statement with its coerced parameters, in binding order
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    /// Column bound at each position (same length as `params`)
    pub columns: Vec<ColumnInfo>,
    pub params: Vec<SqlValue>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InsertOptions {
    /// Leave out blank columns that carry a default (serial keys, `now()`)
    pub use_defaults: bool,
}

fn check_known_columns(schema: &TableSchema, input: &FormInput) -> Result<()> {
    match input.keys().find(|k| schema.column(k).is_none()) {
        Some(unknown) => Err(CoreError::unknown_column(&schema.name, unknown.as_str())),
        None => Ok(()),
    }
}

fn is_blank(input: Option<&String>) -> bool {
    input.map(|s| s.trim().is_empty()).unwrap_or(true)
}

/// Plan an INSERT covering every declared column.
///
/// Missing or blank input becomes NULL, unless `use_defaults` drops a blank
/// column that has a database default.
pub fn plan_insert(
    table: TableRef<'_>,
    schema: &TableSchema,
    input: &FormInput,
    options: InsertOptions,
) -> Result<BoundStatement> {
    check_known_columns(schema, input)?;

    let columns: Vec<&ColumnInfo> = schema
        .columns
        .iter()
        .filter(|c| !(options.use_defaults && c.has_default() && is_blank(input.get(&c.name))))
        .collect();

    let params = columns
        .iter()
        .map(|c| {
            let text = input.get(&c.name).map(String::as_str).unwrap_or("");
            parse_input_value(&c.name, text, &c.data_type)
        })
        .collect::<Result<Vec<_>>>()?;

    let stmt = build_insert(table, &columns);
    debug!(table = %schema.name, columns = columns.len(), "planned insert");

    Ok(BoundStatement {
        sql: stmt.sql,
        columns: columns.into_iter().cloned().collect(),
        params,
    })
}

/// Plan an UPDATE of the row identified by `key`.
///
/// `current` is the row as loaded (text per column), which prefills every
/// non-key column the input leaves out. Key values always come from `key`.
/// Only columns present in `input` are coerced; everything else is bound as
/// the stored text, so untouched cells keep their exact value.
pub fn plan_update(
    table: TableRef<'_>,
    schema: &TableSchema,
    key: &RowKey,
    current: &BTreeMap<String, Option<String>>,
    input: &FormInput,
) -> Result<BoundStatement> {
    check_known_columns(schema, input)?;
    if let Some(k) = input.keys().find(|k| schema.is_key_column(k)) {
        return Err(CoreError::KeyColumnNotEditable { column: k.clone() });
    }

    let all: Vec<&ColumnInfo> = schema.columns.iter().collect();
    let keys = schema.key_columns();
    let stmt = build_update(table, &all, &keys)?;

    let mut params = Vec::with_capacity(stmt.bind_columns.len());
    let mut columns = Vec::with_capacity(stmt.bind_columns.len());
    for name in &stmt.bind_columns {
        let column = schema
            .column(name)
            .ok_or_else(|| CoreError::unknown_column(&schema.name, name.as_str()))?;

        // Only typed-in values are coerced. Key and untouched values go back
        // exactly as the database printed them; the `$n::"udt"` cast parses them.
        let value = if schema.is_key_column(name) {
            let text = key
                .value_of(name)
                .ok_or_else(|| CoreError::invalid_row_key(&schema.name, format!("no value for '{}'", name)))?;
            SqlValue::stored(text)
        } else {
            match input.get(name) {
                Some(v) => parse_input_value(name, v, &column.data_type)?,
                None => SqlValue::stored(current.get(name).and_then(|v| v.as_deref())),
            }
        };

        params.push(value);
        columns.push(column.clone());
    }

    debug!(table = %schema.name, key = %key.label(), "planned update");

    Ok(BoundStatement {
        sql: stmt.sql,
        columns,
        params,
    })
}

/// Split `column=value` arguments into form input. Only the first `=`
/// separates, so values may contain `=`.
pub fn parse_assignments<I, S>(args: I) -> Result<FormInput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((col, val)) if !col.trim().is_empty() => {
                    Ok((col.trim().to_owned(), val.to_owned()))
                }
                _ => Err(CoreError::InvalidAssignment {
                    input: arg.to_owned(),
                }),
            }
        })
        .collect()
}
