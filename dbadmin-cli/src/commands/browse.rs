//! Read-only commands: tables, describe, rows, keys, form

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use dbadmin_core::render::{render_grid, render_schema, render_table};
use dbadmin_core::{Form, FormMode};
use dbadmin_server::KeySelector;

use super::Session;

#[derive(Parser, Debug)]
pub struct TableArgs {
    /// Table name (case-sensitive, as stored in the catalog)
    pub table: String,
}

#[derive(Parser, Debug)]
pub struct RowsArgs {
    /// Table name
    pub table: String,

    /// Maximum rows to show (1-1000, default from config)
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,

    /// Order by primary key
    #[arg(long)]
    pub ordered: bool,
}

#[derive(Parser, Debug)]
pub struct FormArgs {
    /// Table name
    pub table: String,

    /// Row label (as listed by `keys`) to prefill an edit form
    #[arg(long)]
    pub key: Option<String>,
}

pub async fn run_tables(session: &Session) -> Result<()> {
    let tables = session.service.tables().await?;
    session.emit(&json!({ "schema": session.service.schema(), "tables": tables }), || {
        if tables.is_empty() {
            return format!("No tables in schema {}.\n", session.service.schema());
        }
        let mut out = tables.join("\n");
        out.push('\n');
        out
    })
}

pub async fn run_describe(session: &Session, args: TableArgs) -> Result<()> {
    let schema = session.service.describe(&args.table).await?;
    session.emit(&schema, || render_schema(&schema))
}

pub async fn run_rows(session: &Session, args: RowsArgs) -> Result<()> {
    let rows = session
        .service
        .sample(&args.table, args.limit, args.ordered)
        .await?;
    session.emit(&rows, || {
        if rows.is_empty() {
            "No rows.\n".to_owned()
        } else {
            format!("{}({} rows)\n", render_table(&rows), rows.len())
        }
    })
}

pub async fn run_keys(session: &Session, args: TableArgs) -> Result<()> {
    let keys = session.service.keys(&args.table).await?;
    session.emit(&keys, || {
        let mut out = keys.join("\n");
        out.push('\n');
        out
    })
}

fn render_form(form: &Form) -> String {
    let headers: Vec<String> = ["Field", "Value", "Notes"].iter().map(|s| s.to_string()).collect();
    let rows: Vec<Vec<String>> = form
        .fields
        .iter()
        .map(|f| {
            let mut notes = Vec::new();
            if f.read_only {
                notes.push("key, read-only");
            }
            if !f.nullable {
                notes.push("required");
            }
            if f.has_default {
                notes.push("has default");
            }
            vec![f.label.clone(), f.value.clone(), notes.join(", ")]
        })
        .collect();

    let title = match &form.key {
        Some(key) => format!("Edit {} [{}]\n\n", form.table, key),
        None => format!("Insert into {}\n\n", form.table),
    };
    format!("{}{}", title, render_grid(&headers, &rows))
}

pub async fn run_form(session: &Session, args: FormArgs) -> Result<()> {
    let (mode, selector) = match args.key {
        Some(label) => (FormMode::Edit, Some(KeySelector::Label(label))),
        None => (FormMode::Insert, None),
    };
    let form = session.service.form(&args.table, mode, selector.as_ref()).await?;
    session.emit(&form, || render_form(&form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbadmin_core::FormField;

    #[test]
    fn form_notes_flag_key_and_required() {
        let form = Form {
            table: "Laboratório".into(),
            mode: FormMode::Edit,
            key: Some("3".into()),
            fields: vec![FormField {
                name: "id".into(),
                label: "id (integer)".into(),
                data_type: "integer".into(),
                nullable: false,
                has_default: false,
                value: "3".into(),
                read_only: true,
            }],
        };
        let out = render_form(&form);
        assert!(out.starts_with("Edit Laboratório [3]"));
        assert!(out.contains("key, read-only, required"));
    }
}
