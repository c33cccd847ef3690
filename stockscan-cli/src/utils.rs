//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use stockscan_core::{export_filename, AssetRecord, ClientConfig, PatternRegistry, ScanApiClient};
use tracing::debug;

use crate::RemoteArgs;

/// Load a JSON array of asset records.
pub fn load_assets(path: &Path) -> Result<Vec<AssetRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let assets: Vec<AssetRecord> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse asset file: {}", path.display()))?;

    debug!(path = %path.display(), assets = assets.len(), "Loaded assets");
    Ok(assets)
}

/// Built-in registry, preceded by the providers of an optional pattern file.
pub fn load_registry(patterns: Option<&Path>) -> Result<PatternRegistry> {
    let mut builder = PatternRegistry::builder();

    if let Some(path) = patterns {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern file: {}", path.display()))?;
        builder = builder
            .contribute_json(&json)
            .with_context(|| format!("Invalid pattern file: {}", path.display()))?;
        debug!(
            path = %path.display(),
            contributions = builder.contribution_count(),
            "Loaded pattern file"
        );
    }

    Ok(builder.build()?)
}

/// Client for the server named by `--server`/`STOCKSCAN_SERVER`.
pub fn connect(remote: &RemoteArgs, command: &str) -> Result<ScanApiClient> {
    let Some(server) = remote.server.as_deref() else {
        bail!("`{command}` requires --server (or STOCKSCAN_SERVER)");
    };

    let mut config = ClientConfig::new(server);
    if let Some(token) = &remote.token {
        config = config.with_token(token.clone());
    }

    debug!(server, authenticated = config.token.is_some(), "Connecting to scan server");
    Ok(ScanApiClient::new(config)?)
}

/// Resolve the CSV destination: a directory receives the default export name.
pub fn resolve_output(path: &Path, label: &str, at: DateTime<Utc>) -> PathBuf {
    if path.is_dir() {
        path.join(export_filename(label, at))
    } else {
        path.to_path_buf()
    }
}

/// Shorten `text` to at most `max` characters for table output.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short.jpg", 20), "short.jpg");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_resolve_output_keeps_file_path() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let path = Path::new("does-not-exist/results.csv");
        assert_eq!(resolve_output(path, "local", at), path.to_path_buf());
    }

    #[test]
    fn test_resolve_output_names_file_in_directory() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let dir = std::env::temp_dir();
        assert_eq!(
            resolve_output(&dir, "local", at),
            dir.join("local-media-copyright-scan-2024-03-09T14:05:00.000Z.csv")
        );
    }

    #[test]
    fn test_connect_requires_server() {
        let remote = RemoteArgs {
            server: None,
            token: None,
        };
        let err = connect(&remote, "flag").unwrap_err();
        assert!(err.to_string().contains("requires --server"));
    }

    #[test]
    fn test_load_registry_without_file_is_builtin() {
        let registry = load_registry(None).unwrap();
        assert_eq!(registry.rules().len(), 50);
    }
}
