//! StockScan Core - stock-provider attribution for media libraries
//!
//! This crate finds media assets whose filename, title, alt text or
//! description carry the naming conventions of a known stock-photo provider,
//! and keeps track of the assets an operator has reviewed and cleared.
//!
//! # Features
//!
//! - Built-in table of 50 stock providers, extensible at startup
//! - Case-insensitive multi-field matching, first provider wins
//! - Fixed-size, resumable batch scanning over unbounded collections
//! - Idempotent safe flags that partition the collection
//! - CSV export of accumulated results
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stockscan_core::{
//!     AssetRecord, Caller, InMemoryAssetStore, PatternRegistry, ScanController, ScanSession,
//! };
//!
//! # async fn example() -> stockscan_core::Result<()> {
//! let store = Arc::new(InMemoryAssetStore::from_assets([
//!     AssetRecord::new(1).with_filename("shutterstock_12345.jpg"),
//!     AssetRecord::new(2).with_filename("vacation.jpg"),
//! ]));
//! let controller = ScanController::new(store, Arc::new(PatternRegistry::builtin()));
//!
//! let mut session = ScanSession::new();
//! session
//!     .run(&controller.bind(Caller::operator("editor")), |_| {})
//!     .await?;
//!
//! assert_eq!(session.matched().count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod controller;
pub mod error;
pub mod export;
pub mod guard;
pub mod matcher;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod store;

#[cfg(feature = "client")]
pub mod client;

// Re-export main types for convenience
pub use asset::{AssetRecord, MatchResult, UNKNOWN_SOURCE};
pub use controller::{BoundController, ScanConfig, ScanController, DEFAULT_BATCH_SIZE};
pub use error::{Result, ScanError};
pub use export::{export_filename, to_csv_string, write_csv, CSV_HEADER};
pub use guard::{AccessGuard, Caller, CapabilityGuard, MANAGE_MEDIA};
pub use matcher::{attribute, match_asset};
pub use protocol::{
    FlagRequest, FlagResponse, ProviderSummary, ProvidersResponse, SafeListResponse, ScanRequest,
    ScanResponse,
};
pub use registry::{MatchRule, PatternRegistry, ProviderRuleSet, RegistryBuilder};
pub use session::{
    BatchSource, CancelHandle, ScanProgress, ScanSession, SessionOutcome, SessionState,
};
pub use store::{AssetStore, InMemoryAssetStore};

#[cfg(feature = "client")]
pub use client::{ClientConfig, ScanApiClient};
