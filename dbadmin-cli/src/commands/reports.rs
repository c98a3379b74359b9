//! Report commands

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use dbadmin_core::render::{render_grid, render_table};
use dbadmin_core::{DbAdminConfig, ReportCatalog};

use super::Session;

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Report id (see `dbadmin reports`)
    pub id: String,

    /// Search term, matched anywhere with ILIKE; empty matches all
    #[arg(default_value = "")]
    pub term: String,
}

/// List reports; needs no connection.
pub fn run_reports(config: &DbAdminConfig, json_output: bool) -> Result<()> {
    let catalog = ReportCatalog::with_extra(config.reports.iter().cloned());

    if json_output {
        let summary: Vec<_> = catalog
            .iter()
            .map(|r| json!({ "id": r.id, "title": r.title, "prompt": r.prompt }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let headers: Vec<String> = ["Id", "Title", "Search term"].iter().map(|s| s.to_string()).collect();
    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|r| vec![r.id.clone(), r.title.clone(), r.prompt.clone()])
        .collect();
    print!("{}", render_grid(&headers, &rows));
    Ok(())
}

pub async fn run_report(session: &Session, args: ReportArgs) -> Result<()> {
    let (report, result) = session
        .service
        .run_report(&args.id, &args.term)
        .await
        .context(format!("Report {} failed", args.id))?;

    let body = json!({
        "id": report.id,
        "title": report.title,
        "term": args.term,
        "columns": result.columns,
        "rows": result.rows,
    });
    session.emit(&body, || {
        let mut out = format!("{}\n\n", report.title);
        if result.is_empty() {
            out.push_str("No results.\n");
        } else {
            out.push_str(&render_table(&result));
            out.push_str(&format!("({} rows)\n", result.len()));
        }
        out
    })
}
