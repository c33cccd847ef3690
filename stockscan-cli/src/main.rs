//! StockScan CLI - Stock-provider attribution for media libraries.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use stockscan_core::DEFAULT_BATCH_SIZE;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Usage error (invalid arguments or input data)
  66  Input file missing or unreadable
  69  Scan server unavailable
  74  Cannot write output file
  77  Missing or rejected admin token";

#[derive(Parser)]
#[command(name = "stockscan")]
#[command(author, version, about = "Stock-provider attribution for media libraries", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Suppress human-readable output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Connection to a running stockscan-server.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Scan server base URL
    #[arg(long, value_name = "URL", env = "STOCKSCAN_SERVER")]
    pub server: Option<String>,

    /// Admin bearer token carrying the manage_media capability
    #[arg(long, value_name = "TOKEN", env = "STOCKSCAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every unflagged asset batch by batch and attribute providers
    Scan {
        /// JSON array of asset records to scan locally instead of a server
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        remote: RemoteArgs,

        /// Extra provider patterns ({"Provider": ["regex", ...]}), local scans only
        #[arg(long, value_name = "FILE")]
        patterns: Option<PathBuf>,

        /// Assets per batch, local scans only
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: u64,

        /// Show and export only assets attributed to a provider
        #[arg(long)]
        matched_only: bool,

        /// Write results as CSV (a directory gets a timestamped file name)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Flag reviewed assets as safe so later scans skip them
    Flag {
        /// Asset ids to flag
        #[arg(value_name = "ID", required = true, num_args = 1..)]
        ids: Vec<i64>,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// List assets flagged as safe
    SafeList {
        #[command(flatten)]
        remote: RemoteArgs,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List provider rules in match order
    Providers {
        #[command(flatten)]
        remote: RemoteArgs,

        /// Extra provider patterns to include in the local listing
        #[arg(long, value_name = "FILE")]
        patterns: Option<PathBuf>,
    },

    /// Attribute free text (a file name, title, alt text...) to a provider
    Match {
        /// Texts to attribute
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        texts: Vec<String>,

        /// Extra provider patterns
        #[arg(long, value_name = "FILE")]
        patterns: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit = match run(cli).await {
        Ok(()) => ExitCode::success(),
        Err(err) => ExitCode::from_anyhow(&err),
    };

    if let Some(message) = &exit.message {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    std::process::exit(exit.code);
}

async fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Scan {
            input,
            remote,
            patterns,
            batch_size,
            matched_only,
            output,
        } => {
            let options = commands::scan::ScanOptions {
                input,
                remote,
                patterns,
                batch_size,
                matched_only,
                output,
            };
            commands::scan::execute(options, quiet).await
        }
        Commands::Flag { ids, remote } => commands::flag::execute(ids, remote, quiet).await,
        Commands::SafeList { remote, json } => {
            commands::safe_list::execute(remote, json, quiet).await
        }
        Commands::Providers { remote, patterns } => {
            commands::providers::execute(remote, patterns, quiet).await
        }
        Commands::Match { texts, patterns } => commands::matching::execute(texts, patterns, quiet),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "stockscan=debug,stockscan_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
