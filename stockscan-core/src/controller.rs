//! Batch scan controller.
//!
//! Serves fixed-size slices of the unflagged asset collection with provider
//! attribution, records safe flags and lists flagged assets. Every operation
//! runs the [`AccessGuard`] before touching the store.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::asset::AssetRecord;
use crate::error::{Result, ScanError};
use crate::guard::{AccessGuard, Caller, CapabilityGuard};
use crate::matcher::attribute;
use crate::protocol::{FlagResponse, ProviderSummary, ScanResponse};
use crate::registry::PatternRegistry;
use crate::session::BatchSource;
use crate::store::AssetStore;

/// Default number of assets per scan slice.
pub const DEFAULT_BATCH_SIZE: u64 = 20;

/// Message returned when a flag request carries no ids.
pub const NO_IMAGES_SELECTED: &str = "No images selected.";

/// Message returned after a successful flag write.
pub const IMAGES_FLAGGED: &str = "Images flagged as safe.";

/// Controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Assets per slice, at least 1
    pub batch_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScanConfig {
    pub fn with_batch_size(batch_size: u64) -> Result<Self> {
        let config = Self { batch_size };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ScanError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scans, flags and lists assets of one store against one registry.
#[derive(Clone)]
pub struct ScanController {
    store: Arc<dyn AssetStore>,
    registry: Arc<PatternRegistry>,
    guard: Arc<dyn AccessGuard>,
    config: ScanConfig,
}

impl std::fmt::Debug for ScanController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanController")
            .field("backend", &self.store.backend_name())
            .field("providers", &self.registry.rules().len())
            .field("config", &self.config)
            .finish()
    }
}

impl ScanController {
    /// Controller with the default [`CapabilityGuard`] and [`ScanConfig`].
    pub fn new(store: Arc<dyn AssetStore>, registry: Arc<PatternRegistry>) -> Self {
        Self {
            store,
            registry,
            guard: Arc::new(CapabilityGuard::default()),
            config: ScanConfig::default(),
        }
    }

    pub fn with_guard(mut self, guard: Arc<dyn AccessGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_config(mut self, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Scan one slice of unflagged assets starting at `offset`.
    ///
    /// Every asset of the slice is returned; unmatched ones carry no source.
    /// `has_more` is true while unflagged assets remain past this slice.
    pub async fn scan_batch(&self, caller: &Caller, offset: u64) -> Result<ScanResponse> {
        self.guard.authorize(caller, "scan")?;

        let batch_size = self.config.batch_size;
        let assets = self.store.fetch_unflagged(offset, batch_size).await?;
        let total = self.store.count_unflagged().await?;

        let rules = self.registry.rules();
        let results: Vec<_> = assets
            .into_iter()
            .map(|asset| attribute(asset, rules))
            .collect();

        let response = ScanResponse {
            has_more: total > offset.saturating_add(batch_size),
            results,
            total,
            batch_size,
        };

        tracing::debug!(
            offset,
            batch_size,
            scanned = response.results.len(),
            matched = response.matched_count(),
            total,
            has_more = response.has_more,
            "Scanned batch"
        );

        Ok(response)
    }

    /// Record a safe flag for every id in `ids`.
    ///
    /// Repeated ids and ids that are already flagged are ignored.
    pub async fn flag_safe(&self, caller: &Caller, ids: &[i64]) -> Result<FlagResponse> {
        self.guard.authorize(caller, "flag")?;

        if ids.is_empty() {
            return Err(ScanError::invalid_input(NO_IMAGES_SELECTED));
        }

        let unique: BTreeSet<i64> = ids.iter().copied().collect();
        let mut newly_flagged = 0usize;
        for id in &unique {
            if self.store.flag_safe(*id).await? {
                newly_flagged += 1;
            }
        }

        tracing::info!(
            subject = %caller.subject,
            requested = unique.len(),
            newly_flagged,
            "Flagged assets as safe"
        );

        Ok(FlagResponse {
            success: true,
            message: IMAGES_FLAGGED.to_string(),
        })
    }

    /// Every flagged asset in store order.
    pub async fn list_flagged(&self, caller: &Caller) -> Result<Vec<AssetRecord>> {
        self.guard.authorize(caller, "list")?;
        self.store.list_flagged().await
    }

    /// Providers of the active registry in match order.
    pub fn providers(&self, caller: &Caller) -> Result<Vec<ProviderSummary>> {
        self.guard.authorize(caller, "providers")?;
        Ok(self.registry.rules().summaries())
    }

    /// Bind `caller` to this controller so a [`ScanSession`](crate::ScanSession)
    /// can drive it directly.
    pub fn bind(&self, caller: Caller) -> BoundController {
        BoundController {
            controller: self.clone(),
            caller,
        }
    }
}

/// A controller paired with the caller it scans for.
#[derive(Debug, Clone)]
pub struct BoundController {
    controller: ScanController,
    caller: Caller,
}

#[async_trait]
impl BatchSource for BoundController {
    async fn fetch_batch(&self, offset: u64) -> Result<ScanResponse> {
        self.controller.scan_batch(&self.caller, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryAssetStore;

    fn assets(count: i64) -> Vec<AssetRecord> {
        (1..=count)
            .map(|id| {
                let filename = if id % 5 == 0 {
                    format!("shutterstock_{id}.jpg")
                } else {
                    format!("holiday-{id}.jpg")
                };
                AssetRecord::new(id).with_filename(filename)
            })
            .collect()
    }

    fn controller(count: i64) -> (ScanController, Arc<InMemoryAssetStore>) {
        let store = Arc::new(InMemoryAssetStore::from_assets(assets(count)));
        let controller = ScanController::new(store.clone(), Arc::new(PatternRegistry::builtin()));
        (controller, store)
    }

    fn operator() -> Caller {
        Caller::operator("editor")
    }

    #[tokio::test]
    async fn test_twenty_five_assets_two_batches() {
        let (controller, _) = controller(25);

        let first = controller.scan_batch(&operator(), 0).await.unwrap();
        assert_eq!(first.results.len(), 20);
        assert!(first.has_more);
        assert_eq!(first.total, 25);
        assert_eq!(first.batch_size, 20);

        let second = controller.scan_batch(&operator(), 20).await.unwrap();
        assert_eq!(second.results.len(), 5);
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn test_unmatched_assets_included() {
        let (controller, _) = controller(5);
        let batch = controller.scan_batch(&operator(), 0).await.unwrap();

        assert_eq!(batch.results.len(), 5);
        assert_eq!(batch.matched_count(), 1);
        assert_eq!(batch.results[4].source.as_deref(), Some("Shutterstock"));
        assert!(batch.results[0].source.is_none());
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_more() {
        let (controller, _) = controller(20);
        let batch = controller.scan_batch(&operator(), 0).await.unwrap();
        assert_eq!(batch.results.len(), 20);
        assert!(!batch.has_more);
    }

    #[tokio::test]
    async fn test_unauthorized_caller_rejected() {
        let (controller, store) = controller(3);
        let anonymous = Caller::anonymous();

        assert!(matches!(
            controller.scan_batch(&anonymous, 0).await,
            Err(ScanError::Unauthorized(_))
        ));
        assert!(matches!(
            controller.flag_safe(&anonymous, &[1]).await,
            Err(ScanError::Unauthorized(_))
        ));
        assert!(controller.list_flagged(&anonymous).await.is_err());
        assert!(controller.providers(&anonymous).is_err());
        assert!(!store.is_flagged(1).await);
    }

    #[tokio::test]
    async fn test_flag_empty_ids_rejected() {
        let (controller, store) = controller(3);
        let err = controller.flag_safe(&operator(), &[]).await.unwrap_err();

        match err {
            ScanError::InvalidInput(message) => assert_eq!(message, "No images selected."),
            other => panic!("Expected InvalidInput, got: {:?}", other),
        }
        assert_eq!(store.count_unflagged().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_flag_idempotent() {
        let (controller, _) = controller(6);

        let response = controller.flag_safe(&operator(), &[5]).await.unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Images flagged as safe.");
        controller.flag_safe(&operator(), &[5, 5]).await.unwrap();

        let flagged = controller.list_flagged(&operator()).await.unwrap();
        assert_eq!(flagged.iter().filter(|a| a.id == 5).count(), 1);
        assert_eq!(flagged.len(), 1);
    }

    #[tokio::test]
    async fn test_flagged_and_unflagged_partition() {
        let (controller, _) = controller(45);
        controller
            .flag_safe(&operator(), &[3, 17, 22, 40])
            .await
            .unwrap();

        let mut scanned = Vec::new();
        let mut offset = 0;
        loop {
            let batch = controller.scan_batch(&operator(), offset).await.unwrap();
            scanned.extend(batch.results.iter().map(|r| r.asset.id));
            if !batch.has_more {
                break;
            }
            offset += batch.batch_size;
        }
        let flagged: Vec<i64> = controller
            .list_flagged(&operator())
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();

        assert_eq!(flagged, [3, 17, 22, 40]);
        assert_eq!(scanned.len(), 41);
        assert!(scanned.iter().all(|id| !flagged.contains(id)));

        let mut all: Vec<i64> = scanned.into_iter().chain(flagged).collect();
        all.sort_unstable();
        assert_eq!(all, (1..=45).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_custom_batch_size() {
        let (controller, _) = controller(7);
        let controller = controller
            .with_config(ScanConfig::with_batch_size(3).unwrap())
            .unwrap();

        let batch = controller.scan_batch(&operator(), 3).await.unwrap();
        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.batch_size, 3);
        assert!(batch.has_more);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(matches!(
            ScanConfig::with_batch_size(0),
            Err(ScanError::InvalidConfig(_))
        ));
        assert_eq!(ScanConfig::default().batch_size, 20);
    }

    #[tokio::test]
    async fn test_providers_in_match_order() {
        let (controller, _) = controller(1);
        let providers = controller.providers(&operator()).unwrap();
        assert_eq!(providers.len(), 50);
        assert_eq!(providers[0].name, "Getty Images");
    }

    #[tokio::test]
    async fn test_bound_controller_is_batch_source() {
        let (controller, _) = controller(2);
        let source = controller.bind(operator());
        let batch = source.fetch_batch(0).await.unwrap();
        assert_eq!(batch.results.len(), 2);
    }
}
