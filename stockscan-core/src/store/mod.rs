//! Asset store abstraction.
//!
//! An [`AssetStore`] owns the media library and the safe-flag bookkeeping:
//!
//! - Unflagged assets are served in a stable id order, so consecutive
//!   `(offset, limit)` windows never overlap while the set is unchanged.
//! - Flagging is idempotent and persists across scans.
//! - Flagged assets never appear in [`AssetStore::fetch_unflagged`].
//!
//! [`InMemoryAssetStore`] is the reference implementation; the server adds a
//! PostgreSQL-backed one.

mod memory;

pub use memory::InMemoryAssetStore;

use async_trait::async_trait;

use crate::asset::AssetRecord;
use crate::error::Result;

/// Source of scannable media and sink for safe flags.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Unflagged assets ordered by id, skipping `offset` and returning at
    /// most `limit`.
    async fn fetch_unflagged(&self, offset: u64, limit: u64) -> Result<Vec<AssetRecord>>;

    /// Number of assets that currently carry no safe flag.
    async fn count_unflagged(&self) -> Result<u64>;

    /// Mark `id` as safe.
    ///
    /// Returns `true` when the flag was newly written. Flagging an already
    /// flagged asset, or an id the store does not hold, returns `false`.
    async fn flag_safe(&self, id: i64) -> Result<bool>;

    /// Every flagged asset, ordered by id.
    async fn list_flagged(&self) -> Result<Vec<AssetRecord>>;

    /// Short backend label for health reporting.
    fn backend_name(&self) -> &'static str;
}
