//! Relationship diagram command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::Session;

#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Write DOT to a file instead of stdout (render with `dot -Tsvg`)
    #[arg(long = "out", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub async fn run_graph(session: &Session, args: GraphArgs) -> Result<()> {
    let dot = session.service.graph().await?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &dot).context(format!("Failed to write {:?}", path))?;
            tracing::info!(path = %path.display(), "relationship graph written");
            if !session.json {
                println!("✓ Wrote {}", path.display());
            }
        }
        None => print!("{}", dot),
    }
    Ok(())
}
