//! HTTP server command
//!
//! Serves the JSON API over the configured schema.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use dbadmin_server::http::{run_server, ServerConfig};

use super::Session;

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: [server] bind, else 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

pub async fn run_serve(session: Session, args: ServeArgs) -> Result<()> {
    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => session
            .config
            .server
            .bind
            .parse()
            .context(format!("Invalid [server] bind address: {}", session.config.server.bind))?,
    };

    let config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || session.config.server.cors_permissive,
    };

    tracing::info!("Starting dbadmin server on {}", config.bind_addr);

    // Blocks until shutdown
    run_server(session.service, config).await.context("Server error")?;
    Ok(())
}
