//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod flags;
pub mod health;
pub mod providers;
pub mod scan;

pub use crate::state::AppState;
pub use flags::{flag_handler, safe_list_handler};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use providers::providers_handler;
pub use scan::scan_handler;
