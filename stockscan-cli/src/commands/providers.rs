//! Providers command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use stockscan_core::ProviderSummary;

use crate::utils::{connect, load_registry};
use crate::RemoteArgs;

/// Execute the providers command.
///
/// Lists the server's registry when a server is configured, otherwise the
/// local one (built-ins plus `--patterns`).
pub async fn execute(remote: RemoteArgs, patterns: Option<PathBuf>, quiet: bool) -> Result<()> {
    let providers = if remote.server.is_some() {
        let client = connect(&remote, "providers")?;
        client
            .providers()
            .await
            .context("Providers request failed")?
    } else {
        load_registry(patterns.as_deref())?.rules().summaries()
    };

    if !quiet {
        print_providers(&providers);
    }

    Ok(())
}

fn print_providers(providers: &[ProviderSummary]) {
    for (position, provider) in providers.iter().enumerate() {
        println!(
            "   {:>3}. {:<28} {}",
            position + 1,
            provider.name,
            format!("{} rule(s)", provider.rule_count).dimmed()
        );
    }
    println!();
    println!("   {} {}", "Providers:".dimmed(), providers.len());
}
