//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::path::Path;
use std::sync::Arc;

use stockscan_core::{
    AssetStore, InMemoryAssetStore, PatternRegistry, ScanConfig, ScanController, ScanError,
};

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::db::PostgresAssetStore;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Scan controller over the configured asset store and pattern registry
    pub controller: ScanController,
    /// Admin token verifier, absent when no secret is configured
    pub token_verifier: Option<Arc<TokenVerifier>>,
}

impl AppState {
    pub fn new(controller: ScanController) -> Self {
        Self {
            controller,
            token_verifier: None,
        }
    }

    pub fn with_token_verifier(mut self, verifier: TokenVerifier) -> Self {
        self.token_verifier = Some(Arc::new(verifier));
        self
    }

    /// Build state from configuration.
    ///
    /// Uses PostgreSQL if `database_url` is set, otherwise falls back to an
    /// in-memory store that starts empty.
    pub async fn from_config(config: &Config) -> Result<Self, ScanError> {
        let registry = load_registry(config.pattern_extensions_path.as_deref())?;

        let store: Arc<dyn AssetStore> = match &config.database_url {
            Some(url) => {
                tracing::info!("Using PostgreSQL asset store");
                let store = PostgresAssetStore::connect(
                    url,
                    config.database_max_connections,
                    config.database_min_connections,
                )
                .await?;
                Arc::new(store)
            }
            None => {
                tracing::warn!(
                    "DATABASE_URL not set, using in-memory asset store - flags will be lost on restart!"
                );
                Arc::new(InMemoryAssetStore::new())
            }
        };

        let controller = ScanController::new(store, Arc::new(registry))
            .with_config(ScanConfig::with_batch_size(config.scan_batch_size)?)?;

        let state = Self::new(controller);
        match &config.admin_jwt_secret {
            Some(secret) => Ok(state.with_token_verifier(TokenVerifier::new(secret.as_bytes()))),
            None => {
                tracing::warn!("ADMIN_JWT_SECRET not set, admin routes will reject every request");
                Ok(state)
            }
        }
    }

    /// Label of the asset store backend ("memory" or "postgres").
    pub fn store_backend(&self) -> &'static str {
        self.controller.store().backend_name()
    }
}

/// Built-in providers, preceded by those of the optional extension file.
pub fn load_registry(extensions: Option<&Path>) -> Result<PatternRegistry, ScanError> {
    let mut builder = PatternRegistry::builder();

    if let Some(path) = extensions {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ScanError::InvalidConfig(format!(
                "Cannot read pattern file {}: {e}",
                path.display()
            ))
        })?;
        builder = builder.contribute_json(&json)?;
        tracing::info!(
            path = %path.display(),
            contributions = builder.contribution_count(),
            "Loaded pattern extensions"
        );
    }

    let registry = builder.build()?;
    tracing::info!(providers = registry.rules().len(), "Pattern registry ready");
    Ok(registry)
}
