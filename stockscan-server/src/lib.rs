//! StockScan Server Library - REST API components for stock-provider scanning
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validation;

pub use auth::{AdminCaller, AdminClaims, TokenVerifier};
pub use config::Config;
pub use db::{PostgresAssetStore, StoreError};
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::{create_router, create_router_with_config};
pub use state::{load_registry, AppState};
