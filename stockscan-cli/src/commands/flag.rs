//! Flag command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use crate::utils::connect;
use crate::RemoteArgs;

/// Execute the flag command.
pub async fn execute(ids: Vec<i64>, remote: RemoteArgs, quiet: bool) -> Result<()> {
    let client = connect(&remote, "flag")?;

    let response = client.flag(&ids).await.context("Flag request failed")?;
    info!(count = ids.len(), "Assets flagged as safe");

    if !quiet {
        println!("{}", response.message.green().bold());
        println!("   {} {}", "Assets:".dimmed(), format_ids(&ids));
    }

    Ok(())
}

fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ids() {
        assert_eq!(format_ids(&[3, 10, 42]), "3, 10, 42");
        assert_eq!(format_ids(&[7]), "7");
    }
}
