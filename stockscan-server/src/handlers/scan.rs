//! Batch scan handler
//!
//! Handles POST /api/v1/scan requests: one slice of the unflagged collection
//! with provider attribution per asset.

use axum::{extract::State, Json};
use stockscan_core::{ScanRequest, ScanResponse};

use crate::auth::AdminCaller;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_offset;

/// Scan one batch of unflagged assets
///
/// Returns every asset of the slice starting at `offset`, each with the
/// matching stock provider or `null`. Request the next slice at
/// `offset + batchSize` while `hasMore` is true.
#[utoipa::path(
    post,
    path = "/api/v1/scan",
    tag = "Scanning",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scanned batch", body = ScanResponse),
        (status = 400, description = "Negative offset"),
        (status = 401, description = "Missing token or administrative capability"),
        (status = 503, description = "Asset store unavailable")
    ),
    security(
        ("admin_token" = [])
    )
)]
pub async fn scan_handler(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let offset = validate_offset(request.offset)?;
    let response = state.controller.scan_batch(&caller, offset).await?;

    tracing::info!(
        subject = %caller.subject,
        offset,
        scanned = response.results.len(),
        matched = response.matched_count(),
        has_more = response.has_more,
        "Scan batch served"
    );

    Ok(Json(response))
}
