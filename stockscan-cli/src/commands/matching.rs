//! Match command implementation.
//!
//! Runs free text through the registry as if it were an asset file name,
//! which is handy when writing new provider patterns.

use std::path::PathBuf;

use anyhow::{bail, Result};
use colored::Colorize;
use stockscan_core::{match_asset, AssetRecord, PatternRegistry, UNKNOWN_SOURCE};

use crate::utils::load_registry;

/// Execute the match command.
///
/// Fails when none of the texts matched, so scripts can test a name with the
/// exit status alone.
pub fn execute(texts: Vec<String>, patterns: Option<PathBuf>, quiet: bool) -> Result<()> {
    let registry = load_registry(patterns.as_deref())?;

    let mut matched = 0;
    for text in &texts {
        let source = attribute_text(&registry, text);
        if source.is_some() {
            matched += 1;
        }

        if !quiet {
            match source {
                Some(name) => println!("{}  {}", name.yellow().bold(), text),
                None => println!("{}  {}", UNKNOWN_SOURCE.dimmed(), text),
            }
        }
    }

    if matched == 0 {
        bail!("No provider matched");
    }
    Ok(())
}

fn attribute_text<'r>(registry: &'r PatternRegistry, text: &str) -> Option<&'r str> {
    let probe = AssetRecord::new(0).with_filename(text);
    match_asset(&probe, registry.rules())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_text() {
        let registry = PatternRegistry::builtin();

        assert_eq!(
            attribute_text(&registry, "AdobeStock_987654.jpeg"),
            Some("Adobe Stock")
        );
        assert_eq!(attribute_text(&registry, "holiday-2023.jpg"), None);
    }
}
