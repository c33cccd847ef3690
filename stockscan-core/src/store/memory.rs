//! In-memory asset store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::AssetStore;
use crate::asset::AssetRecord;
use crate::error::Result;

#[derive(Debug, Default)]
struct Inner {
    assets: BTreeMap<i64, AssetRecord>,
    flags: BTreeMap<i64, DateTime<Utc>>,
}

/// Asset store held entirely in process memory.
///
/// Assets and flags share one lock, so a flag write and a concurrent page
/// read always observe a consistent unflagged set. Data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    inner: RwLock<Inner>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `assets`. A repeated id keeps the last record.
    pub fn from_assets(assets: impl IntoIterator<Item = AssetRecord>) -> Self {
        let assets = assets.into_iter().map(|a| (a.id, a)).collect();
        Self {
            inner: RwLock::new(Inner {
                assets,
                flags: BTreeMap::new(),
            }),
        }
    }

    /// Insert or replace an asset. Existing flags are kept.
    pub async fn insert(&self, asset: AssetRecord) {
        self.inner.write().await.assets.insert(asset.id, asset);
    }

    pub async fn is_flagged(&self, id: i64) -> bool {
        self.inner.read().await.flags.contains_key(&id)
    }

    /// When `id` was flagged, if it is.
    pub async fn flagged_at(&self, id: i64) -> Option<DateTime<Utc>> {
        self.inner.read().await.flags.get(&id).copied()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.assets.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.assets.is_empty()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn fetch_unflagged(&self, offset: u64, limit: u64) -> Result<Vec<AssetRecord>> {
        let inner = self.inner.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(inner
            .assets
            .values()
            .filter(|a| !inner.flags.contains_key(&a.id))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_unflagged(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        let count = inner
            .assets
            .keys()
            .filter(|id| !inner.flags.contains_key(id))
            .count();
        Ok(count as u64)
    }

    async fn flag_safe(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if !inner.assets.contains_key(&id) || inner.flags.contains_key(&id) {
            return Ok(false);
        }
        inner.flags.insert(id, Utc::now());
        Ok(true)
    }

    async fn list_flagged(&self) -> Result<Vec<AssetRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .flags
            .keys()
            .filter_map(|id| inner.assets.get(id))
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(count: i64) -> InMemoryAssetStore {
        InMemoryAssetStore::from_assets(
            (1..=count).map(|id| AssetRecord::new(id).with_filename(format!("img-{id}.jpg"))),
        )
    }

    fn ids(assets: &[AssetRecord]) -> Vec<i64> {
        assets.iter().map(|a| a.id).collect()
    }

    #[tokio::test]
    async fn test_fetch_pages_in_id_order() {
        let store = InMemoryAssetStore::from_assets([
            AssetRecord::new(30),
            AssetRecord::new(10),
            AssetRecord::new(20),
        ]);

        assert_eq!(ids(&store.fetch_unflagged(0, 2).await.unwrap()), [10, 20]);
        assert_eq!(ids(&store.fetch_unflagged(2, 2).await.unwrap()), [30]);
        assert!(store.fetch_unflagged(3, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flagged_assets_excluded() {
        let store = store_with(5);
        assert!(store.flag_safe(2).await.unwrap());
        assert!(store.flag_safe(4).await.unwrap());

        assert_eq!(ids(&store.fetch_unflagged(0, 10).await.unwrap()), [1, 3, 5]);
        assert_eq!(store.count_unflagged().await.unwrap(), 3);
        assert_eq!(ids(&store.list_flagged().await.unwrap()), [2, 4]);
    }

    #[tokio::test]
    async fn test_flag_idempotent() {
        let store = store_with(3);
        assert!(store.flag_safe(1).await.unwrap());
        let first = store.flagged_at(1).await;

        assert!(!store.flag_safe(1).await.unwrap());
        assert_eq!(store.flagged_at(1).await, first);
        assert_eq!(store.list_flagged().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_flag_unknown_id_is_noop() {
        let store = store_with(2);
        assert!(!store.flag_safe(99).await.unwrap());
        assert!(!store.is_flagged(99).await);
        assert!(store.list_flagged().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_keeps_flag() {
        let store = store_with(1);
        store.flag_safe(1).await.unwrap();
        store
            .insert(AssetRecord::new(1).with_title("renamed"))
            .await;

        assert!(store.is_flagged(1).await);
        assert_eq!(store.list_flagged().await.unwrap()[0].title, "renamed");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryAssetStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.count_unflagged().await.unwrap(), 0);
        assert!(store.fetch_unflagged(0, 20).await.unwrap().is_empty());
        assert_eq!(store.backend_name(), "memory");
    }
}
