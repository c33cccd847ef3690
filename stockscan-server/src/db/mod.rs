//! Database module for StockScan Server
//!
//! PostgreSQL-backed asset store. Tables:
//! - `media_assets`: the scannable media library
//! - `asset_safe_flags`: one row per asset an operator has cleared

pub mod assets;
pub mod error;

pub use assets::PostgresAssetStore;
pub use error::StoreError;
