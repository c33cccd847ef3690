//! Safe-list command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use crate::utils::{connect, truncate};
use crate::RemoteArgs;

/// Execute the safe-list command.
pub async fn execute(remote: RemoteArgs, json: bool, quiet: bool) -> Result<()> {
    let client = connect(&remote, "safe-list")?;

    let assets = client
        .safe_list()
        .await
        .context("Safe list request failed")?;
    debug!(count = assets.len(), "Fetched safe list");

    if json {
        let out =
            serde_json::to_string_pretty(&assets).context("Failed to serialize safe list")?;
        println!("{out}");
        return Ok(());
    }

    if quiet {
        return Ok(());
    }

    if assets.is_empty() {
        println!("{}", "No assets flagged as safe.".dimmed());
        return Ok(());
    }

    println!(
        "   {:>8}  {:<40}  {}",
        "ID".bold(),
        "Filename".bold(),
        "Title".bold()
    );
    for asset in &assets {
        println!(
            "   {:>8}  {:<40}  {}",
            asset.id,
            truncate(&asset.filename, 40),
            truncate(&asset.title, 40)
        );
    }
    println!();
    println!("   {} {}", "Flagged:".dimmed(), assets.len());

    Ok(())
}
