//! Dynamic SQL statement builder
//!
//! Builds parameterized INSERT/UPDATE/SELECT text from column metadata.
//! Invariants every builder keeps:
//! - each column appears once, quoted, in the order given
//! - placeholders are numbered `$1..$n` without gaps, in binding order
//! - each placeholder is cast to the column's declared type

use std::fmt;

use crate::error::{CoreError, Result};
use crate::ident::{qualified, quote_ident};
use crate::schema::ColumnInfo;

/// Table a statement targets, optionally schema-qualified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef<'a> {
    pub schema: Option<&'a str>,
    pub name: &'a str,
}

impl<'a> TableRef<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { schema: None, name }
    }

    pub fn in_schema(schema: &'a str, name: &'a str) -> Self {
        Self {
            schema: Some(schema),
            name,
        }
    }
}

impl fmt::Display for TableRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.schema {
            Some(schema) => f.write_str(&qualified(schema, self.name)),
            None => f.write_str(&quote_ident(self.name)),
        }
    }
}

/// Generated SQL plus the column bound to each placeholder, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub bind_columns: Vec<String>,
}

/// `$n::"type"` placeholder for a column
fn placeholder(n: usize, column: &ColumnInfo) -> String {
    format!("${}::{}", n, quote_ident(column.cast_type()))
}

/// `"col" = $n::"type"` assignments starting at placeholder `start`
fn assignments(columns: &[&ColumnInfo], start: usize) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = {}", quote_ident(&c.name), placeholder(start + i, c)))
        .collect()
}

fn names(columns: &[&ColumnInfo]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}

/// `INSERT INTO "t" ("a", "b") VALUES ($1::"int4", $2::"varchar")`
///
/// An empty column list yields `INSERT INTO "t" DEFAULT VALUES`.
pub fn build_insert(table: TableRef<'_>, columns: &[&ColumnInfo]) -> Statement {
    if columns.is_empty() {
        return Statement {
            sql: format!("INSERT INTO {} DEFAULT VALUES", table),
            bind_columns: Vec::new(),
        };
    }

    let cols = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let values = columns
        .iter()
        .enumerate()
        .map(|(i, c)| placeholder(i + 1, c))
        .collect::<Vec<_>>()
        .join(", ");

    Statement {
        sql: format!("INSERT INTO {} ({}) VALUES ({})", table, cols, values),
        bind_columns: names(columns),
    }
}

/// `UPDATE "t" SET "a" = $1::…, … WHERE "pk" = $n::… AND …`
///
/// `columns` is every declared column; key columns are moved to WHERE.
/// Binding order is non-key columns (declared order) then key columns
/// (key order).
pub fn build_update(
    table: TableRef<'_>,
    columns: &[&ColumnInfo],
    primary_key: &[&ColumnInfo],
) -> Result<Statement> {
    if primary_key.is_empty() {
        return Err(CoreError::MissingPrimaryKey {
            table: table.name.to_owned(),
        });
    }

    let set_cols: Vec<&ColumnInfo> = columns
        .iter()
        .copied()
        .filter(|c| !primary_key.iter().any(|k| k.name == c.name))
        .collect();
    if set_cols.is_empty() {
        return Err(CoreError::NothingToUpdate {
            table: table.name.to_owned(),
        });
    }

    let set_clause = assignments(&set_cols, 1).join(", ");
    let where_clause = assignments(primary_key, set_cols.len() + 1).join(" AND ");

    let mut bind_columns = names(&set_cols);
    bind_columns.extend(names(primary_key));

    Ok(Statement {
        sql: format!("UPDATE {} SET {} WHERE {}", table, set_clause, where_clause),
        bind_columns,
    })
}

/// Every column cast to text so cells render and round-trip through the
/// edit form. The row limit is bound as `$1`.
pub fn build_select_rows(
    table: TableRef<'_>,
    columns: &[&ColumnInfo],
    order_by: &[&ColumnInfo],
) -> String {
    let mut sql = format!("SELECT {} FROM {}", text_projection(columns), table);
    if !order_by.is_empty() {
        let order = order_by
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" ORDER BY {}", order));
    }
    sql.push_str(" LIMIT $1");
    sql
}

/// Select one row by its key columns, projected as text.
pub fn build_select_by_key(
    table: TableRef<'_>,
    columns: &[&ColumnInfo],
    primary_key: &[&ColumnInfo],
) -> Result<Statement> {
    if primary_key.is_empty() {
        return Err(CoreError::MissingPrimaryKey {
            table: table.name.to_owned(),
        });
    }

    let where_clause = assignments(primary_key, 1).join(" AND ");
    Ok(Statement {
        sql: format!(
            "SELECT {} FROM {} WHERE {}",
            text_projection(columns),
            table,
            where_clause
        ),
        bind_columns: names(primary_key),
    })
}

fn text_projection(columns: &[&ColumnInfo]) -> String {
    if columns.is_empty() {
        return "*".to_owned();
    }
    columns
        .iter()
        .map(|c| {
            let q = quote_ident(&c.name);
            format!("{q}::text AS {q}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}
