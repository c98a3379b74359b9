//! dbadmin CLI - schema-driven PostgreSQL admin console
//!
//! Every table gets the same treatment, driven by catalog metadata:
//! - browse tables, columns, keys, and sample rows
//! - insert and update rows through generated, parameterized SQL
//! - relationship diagram (Graphviz DOT) and fixed search reports
//! - the same operations over HTTP (`serve`)

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dbadmin_core::DbAdminConfig;

mod commands;
mod config;
mod tracing_setup;
mod ui;

use commands::{ConnectOptions, Session};

#[derive(Parser, Debug)]
#[command(
    name = "dbadmin",
    author,
    version,
    about = "Schema-driven admin console for any PostgreSQL schema",
    long_about = "Browse tables, insert and edit rows through forms generated from catalog metadata, \
                  draw foreign-key relationships, and run search reports."
)]
struct Cli {
    /// PostgreSQL connection URL (overrides [database] url)
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// Schema to administer (default: [database] schema, else public)
    #[arg(long, global = true)]
    schema: Option<String>,

    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    /// Suppress progress spinners
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (telemetry builds only)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List tables in the schema
    Tables,
    /// Show columns, primary key, and foreign keys of a table
    Describe(commands::browse::TableArgs),
    /// Show sample rows of a table
    Rows(commands::browse::RowsArgs),
    /// List row labels that can be passed to `update --row`
    Keys(commands::browse::TableArgs),
    /// Show the insert form, or the edit form of one row
    Form(commands::browse::FormArgs),
    /// Insert a row: dbadmin insert <table> col=value...
    Insert(commands::write::InsertArgs),
    /// Update a row identified by --key or --row
    Update(commands::write::UpdateArgs),
    /// Print the foreign-key relationship graph as DOT
    Graph(commands::graph::GraphArgs),
    /// List available reports
    Reports,
    /// Run a report with a search term
    Report(commands::reports::ReportArgs),
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Manage dbadmin configuration (init, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so DATABASE_URL from .env reaches clap
    config::load_dotenv();
    let cli = Cli::parse();

    ui::init_quiet_mode(cli.quiet);
    let tracing_config = tracing_setup::TracingConfig {
        debug: cli.debug,
        default_level: match cli.command {
            Commands::Serve(_) => "info",
            _ => "warn",
        },
        otel: cli.otel,
    };
    if let Err(err) = tracing_setup::init(&tracing_config) {
        eprintln!("Warning: logging setup failed: {err:#}");
    }

    let result = run(cli).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let opts = ConnectOptions {
        database_url: cli.database_url,
        schema: cli.schema,
    };
    let json = cli.json;

    // Commands that need no connection
    let command = match cli.command {
        Commands::Config(args) => return config::run_config(args),
        Commands::Completions(args) => return run_completions(args),
        Commands::Reports => return commands::run_reports(&DbAdminConfig::load()?, json),
        other => other,
    };

    let session = Session::open(opts, json).await?;
    let result = match command {
        Commands::Tables => commands::run_tables(&session).await,
        Commands::Describe(args) => commands::run_describe(&session, args).await,
        Commands::Rows(args) => commands::run_rows(&session, args).await,
        Commands::Keys(args) => commands::run_keys(&session, args).await,
        Commands::Form(args) => commands::run_form(&session, args).await,
        Commands::Insert(args) => commands::run_insert(&session, args).await,
        Commands::Update(args) => commands::run_update(&session, args).await,
        Commands::Graph(args) => commands::run_graph(&session, args).await,
        Commands::Report(args) => commands::run_report(&session, args).await,
        Commands::Serve(args) => return commands::run_serve(session, args).await,
        Commands::Config(_) | Commands::Completions(_) | Commands::Reports => Ok(()),
    };

    session.close().await;
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dbadmin", "rows", "Equipamento", "--limit", "5", "--json", "--schema", "lab"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.schema.as_deref(), Some("lab"));
        match cli.command {
            Commands::Rows(args) => assert_eq!(args.limit, Some(5)),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
