//! Write commands: insert and update
//!
//! Values are `column=value` pairs; an empty value (`nota=`) is NULL.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use dbadmin_core::write::parse_assignments;
use dbadmin_core::InsertOptions;
use dbadmin_server::KeySelector;

use super::Session;

#[derive(Parser, Debug)]
pub struct InsertArgs {
    /// Table name
    pub table: String,

    /// Column values as column=value
    #[arg(value_name = "COLUMN=VALUE")]
    pub values: Vec<String>,

    /// Omit blank columns that have a database default (serial keys, now())
    #[arg(long)]
    pub use_defaults: bool,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Table name
    pub table: String,

    /// New values as column=value; unlisted columns keep their value
    #[arg(value_name = "COLUMN=VALUE", required = true)]
    pub values: Vec<String>,

    /// Key of the row as column=value; repeat once per key column
    #[arg(
        long,
        value_name = "COLUMN=VALUE",
        num_args = 1,
        action = ArgAction::Append,
        required_unless_present = "row",
        conflicts_with = "row"
    )]
    pub key: Vec<String>,

    /// Row label as listed by `keys` (e.g. "2020 / 1")
    #[arg(long, value_name = "LABEL")]
    pub row: Option<String>,
}

impl UpdateArgs {
    fn selector(&self) -> Result<KeySelector> {
        match &self.row {
            Some(label) => Ok(KeySelector::Label(label.clone())),
            None => Ok(KeySelector::Pairs(
                parse_assignments(&self.key).context("Invalid --key")?,
            )),
        }
    }
}

pub async fn run_insert(session: &Session, args: InsertArgs) -> Result<()> {
    let input = parse_assignments(&args.values)?;
    let options = InsertOptions {
        use_defaults: args.use_defaults,
    };

    let outcome = session
        .service
        .insert(&args.table, &input, options)
        .await
        .context(format!("Insert into {} failed", args.table))?;

    session.emit(&outcome, || format!("✓ {}\n", outcome.message))
}

pub async fn run_update(session: &Session, args: UpdateArgs) -> Result<()> {
    let selector = args.selector()?;
    let input = parse_assignments(&args.values)?;

    let outcome = session
        .service
        .update(&args.table, &selector, &input)
        .await
        .context(format!("Update of {} failed", args.table))?;

    session.emit(&outcome, || format!("✓ {}\n", outcome.message))
}
