//! Safe-flag handlers
//!
//! Handles marking assets as reviewed/safe and listing the flagged set.

use axum::{extract::State, Json};
use stockscan_core::{FlagRequest, FlagResponse, SafeListResponse};

use crate::auth::AdminCaller;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_flag_ids;

/// Flag assets as safe
///
/// Flagged assets are excluded from every later scan. Flagging is
/// idempotent; unknown ids are ignored.
#[utoipa::path(
    post,
    path = "/api/v1/flags",
    tag = "Safe flags",
    request_body = FlagRequest,
    responses(
        (status = 200, description = "Assets flagged", body = FlagResponse),
        (status = 400, description = "No images selected or too many ids"),
        (status = 401, description = "Missing token or administrative capability"),
        (status = 503, description = "Asset store unavailable")
    ),
    security(
        ("admin_token" = [])
    )
)]
pub async fn flag_handler(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
    Json(request): Json<FlagRequest>,
) -> Result<Json<FlagResponse>, ApiError> {
    validate_flag_ids(&request.ids)?;
    let response = state.controller.flag_safe(&caller, &request.ids).await?;
    Ok(Json(response))
}

/// List flagged assets
///
/// Returns every asset carrying a safe flag, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/safe",
    tag = "Safe flags",
    responses(
        (status = 200, description = "Flagged assets", body = SafeListResponse),
        (status = 401, description = "Missing token or administrative capability"),
        (status = 503, description = "Asset store unavailable")
    ),
    security(
        ("admin_token" = [])
    )
)]
pub async fn safe_list_handler(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
) -> Result<Json<SafeListResponse>, ApiError> {
    let results = state.controller.list_flagged(&caller).await?;
    tracing::debug!(count = results.len(), "Safe list served");
    Ok(Json(SafeListResponse { results }))
}
