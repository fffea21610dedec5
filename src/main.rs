//! salesdb CLI - Command-line interface for the company sales analysis store

mod commands;

use clap::{Parser, Subcommand};
use salesdb::config::{CONFIG_FILE, SalesdbConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "salesdb")]
#[command(version)]
#[command(about = "Local store for company sales analyses")]
#[command(long_about = r#"
salesdb keeps B2B sales analyses of companies in a local SQLite file:
  • Store an analysis payload (scores, opportunities, challenges, dimensions)
  • Look up the current analysis of a company
  • List every analysis, newest first
  • Report average scores per scoring dimension

Example usage:
  salesdb add --company "Acme" --file acme.json
  salesdb show --company "Acme"
  salesdb patterns
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (default: salesdb.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Store an analysis payload for a company
    Add {
        /// Company name
        #[arg(short = 'n', long)]
        company: String,

        /// JSON payload file, or `-` for stdin
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the current analysis of a company
    Show {
        /// Company name (exact, case-sensitive)
        #[arg(short = 'n', long)]
        company: String,
    },

    /// List every analysis, newest first
    List,

    /// List every analysis of one company, newest first
    History {
        /// Company name (exact, case-sensitive)
        #[arg(short = 'n', long)]
        company: String,
    },

    /// Average score per scoring dimension across all analyses
    Patterns,

    /// Show statistics about the database
    Stats,

    /// Print the version
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

fn success_envelope(command: &str, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    })
}

/// The error chain is flattened into one line, outermost context first
fn failure_envelope(command: &str, err: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "command": command,
        "error": format!("{:#}", err),
    })
}

/// Print the JSON success envelope for a command
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = success_envelope(command, data);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn emit_failure(output_mode: OutputMode, command: &str, err: &anyhow::Error) {
    if output_mode.is_human() {
        salesdb::ui::error(&format!("{:#}", err));
    } else {
        println!("{}", failure_envelope(command, err));
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let command_name = command_name(&cli.command);

    if let Err(err) = run(cli, output_mode) {
        emit_failure(output_mode, command_name, &err);
        std::process::exit(1);
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init { .. } => "init",
        Commands::Add { .. } => "add",
        Commands::Show { .. } => "show",
        Commands::List => "list",
        Commands::History { .. } => "history",
        Commands::Patterns => "patterns",
        Commands::Stats => "stats",
        Commands::Version => "version",
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = SalesdbConfig::load(&config_path)?;
    let database = SalesdbConfig::database_path(config.as_ref(), cli.database.as_deref());
    tracing::debug!("Using database {}", database.display());

    match cli.command {
        Commands::Init { force } => {
            commands::run_init(output_mode, &config_path, &database, force)
        }
        Commands::Add { company, file } => {
            commands::run_add(output_mode, &database, &company, &file)
        }
        Commands::Show { company } => commands::run_show(output_mode, &database, &company),
        Commands::List => commands::run_list(output_mode, &database),
        Commands::History { company } => commands::run_history(output_mode, &database, &company),
        Commands::Patterns => commands::run_patterns(output_mode, &database),
        Commands::Stats => commands::run_stats(output_mode, &database),
        Commands::Version => commands::run_version(output_mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["salesdb", "show", "-n", "Acme", "--json", "-d", "x.db"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.database, Some(PathBuf::from("x.db")));
        assert_eq!(command_name(&cli.command), "show");
        match cli.command {
            Commands::Show { company } => assert_eq!(company, "Acme"),
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_add_requires_company_and_file() {
        assert!(Cli::try_parse_from(["salesdb", "add", "--file", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["salesdb", "add", "--company", "Acme"]).is_err());

        let cli = Cli::try_parse_from(["salesdb", "add", "-n", "Acme", "-f", "-"]).unwrap();
        match cli.command {
            Commands::Add { company, file } => {
                assert_eq!(company, "Acme");
                assert_eq!(file, PathBuf::from("-"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = success_envelope("show", serde_json::Value::Null);
        assert_eq!(envelope, serde_json::json!({"ok": true, "command": "show", "data": null}));
    }

    #[test]
    fn test_failure_envelope_carries_context_chain() {
        let err = anyhow::Error::from(salesdb::Error::Closed).context("failed to open database x.db");
        let envelope = failure_envelope("list", &err);
        assert_eq!(envelope["ok"], false);
        assert_eq!(envelope["command"], "list");
        assert_eq!(
            envelope["error"],
            "failed to open database x.db: Storage error: connection is closed"
        );
    }
}
