//! Command implementations for the dbadmin CLI

pub mod browse;
pub mod graph;
pub mod reports;
pub mod serve;
pub mod write;

use anyhow::{Context, Result};
use serde::Serialize;

use dbadmin_core::DbAdminConfig;
use dbadmin_server::{create_pool_with_options, AdminService};

use crate::config::resolve_database_url;
use crate::ui;

pub use browse::{run_describe, run_form, run_keys, run_rows, run_tables};
pub use graph::run_graph;
pub use reports::{run_report, run_reports};
pub use serve::run_serve;
pub use write::{run_insert, run_update};

/// Connection flags shared by every database command
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub database_url: Option<String>,
    pub schema: Option<String>,
}

/// A connected service plus output mode
pub struct Session {
    pub service: AdminService,
    pub config: DbAdminConfig,
    pub json: bool,
}

impl Session {
    /// Load config, apply flag overrides, and open the pool.
    pub async fn open(opts: ConnectOptions, json: bool) -> Result<Self> {
        let mut config = DbAdminConfig::load()?;
        if let Some(schema) = opts.schema {
            config.database.schema = schema;
        }
        let url = resolve_database_url(opts.database_url, &config)?;

        let pool = ui::with_spinner_async(
            "Connecting to database",
            "Connected",
            create_pool_with_options(&url, config.database.max_connections),
        )
        .await
        .context("Failed to connect to database")?;

        tracing::debug!(schema = %config.database.schema, "session opened");
        let service = AdminService::from_config(pool, &config);
        Ok(Self { service, config, json })
    }

    /// Print `value` as pretty JSON, or `text()` otherwise.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    pub async fn close(self) {
        self.service.pool().close().await;
    }
}
