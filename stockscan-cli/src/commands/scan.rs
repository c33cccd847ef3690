//! Scan command implementation.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use stockscan_core::{
    write_csv, BatchSource, Caller, InMemoryAssetStore, MatchResult, ScanConfig, ScanController,
    ScanSession, SessionOutcome,
};
use tracing::{debug, info, warn};

use crate::utils::{connect, load_assets, load_registry, resolve_output, truncate};
use crate::RemoteArgs;

/// Label used for local scans in export file names.
const LOCAL_LABEL: &str = "local";

pub struct ScanOptions {
    pub input: Option<PathBuf>,
    pub remote: RemoteArgs,
    pub patterns: Option<PathBuf>,
    pub batch_size: u64,
    pub matched_only: bool,
    pub output: Option<PathBuf>,
}

/// Execute the scan command.
///
/// A failed batch stops the session, but the results gathered before it are
/// still printed and exported before the error is returned.
pub async fn execute(options: ScanOptions, quiet: bool) -> Result<()> {
    let (session, outcome, label) = match &options.input {
        Some(input) => {
            let assets = load_assets(input)?;
            let registry = load_registry(options.patterns.as_deref())?;
            let store = Arc::new(InMemoryAssetStore::from_assets(assets));
            let controller = ScanController::new(store, Arc::new(registry))
                .with_config(ScanConfig::with_batch_size(options.batch_size)?)?;

            info!(path = %input.display(), batch_size = options.batch_size, "Scanning local assets");
            let source = controller.bind(Caller::operator("stockscan-cli"));
            let (session, outcome) = run_session(&source, quiet).await;
            (session, outcome, LOCAL_LABEL.to_string())
        }
        None => {
            if options.patterns.is_some() {
                warn!("--patterns is ignored for server scans");
            }
            let client = connect(&options.remote, "scan")?;
            info!("Scanning remote assets");
            let (session, outcome) = run_session(&client, quiet).await;
            (session, outcome, client.host_label())
        }
    };

    if let Err(e) = &outcome {
        warn!(
            error = %e,
            scanned = session.results().len(),
            "Scan stopped early, keeping gathered results"
        );
    }

    let results: Vec<&MatchResult> = if options.matched_only {
        session.matched().collect()
    } else {
        session.results().iter().collect()
    };

    if !quiet {
        print_results(&results);
        print_summary(&session, outcome.as_ref().ok().copied());
    }

    if let Some(output) = &options.output {
        let path = resolve_output(output, &label, Utc::now());
        let file = File::create(&path)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
        let rows = write_csv(file, results.iter().copied())?;

        info!(path = %path.display(), rows, "CSV exported");
        if !quiet {
            println!("   {} {}", "Exported:".dimmed(), path.display());
        }
    }

    outcome.context("Scan failed")?;
    Ok(())
}

/// Drive a session until it completes, fails, or is stopped with Ctrl-C.
///
/// The session is returned in every case so its results stay available.
async fn run_session<S: BatchSource>(
    source: &S,
    quiet: bool,
) -> (ScanSession, stockscan_core::Result<SessionOutcome>) {
    let mut session = ScanSession::new();
    let cancel = session.cancel_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    debug!(session_id = %session.id(), "Starting scan session");
    let outcome = session
        .run(source, |progress| {
            if !quiet {
                eprint!(
                    "\r   Scanning... {:>5.1}%  ({} scanned, {} matched)",
                    progress.percent(),
                    progress.scanned,
                    progress.matched
                );
                let _ = std::io::stderr().flush();
            }
        })
        .await;
    watcher.abort();

    if !quiet {
        eprintln!();
    }

    (session, outcome)
}

fn print_results(results: &[&MatchResult]) {
    if results.is_empty() {
        println!("{}", "No assets to show.".dimmed());
        return;
    }

    println!();
    println!(
        "   {:>8}  {:<40}  {}",
        "ID".bold(),
        "Filename".bold(),
        "Source".bold()
    );
    for result in results {
        let source = if result.is_match() {
            result.source_label().yellow()
        } else {
            result.source_label().dimmed()
        };
        println!(
            "   {:>8}  {:<40}  {}",
            result.asset.id,
            truncate(&result.asset.filename, 40),
            source
        );
    }
}

/// `outcome` is `None` when the session stopped on an error.
fn print_summary(session: &ScanSession, outcome: Option<SessionOutcome>) {
    let progress = session.progress();

    println!();
    match outcome {
        Some(SessionOutcome::Completed) => println!("{}", "Scan complete.".green().bold()),
        Some(SessionOutcome::Cancelled) => println!("{}", "Scan cancelled.".yellow().bold()),
        None => println!("{}", "Scan stopped early.".red().bold()),
    }
    println!("   {} {}", "Scanned:".dimmed(), progress.scanned);
    println!("   {} {}", "Matched:".dimmed(), progress.matched);
}
