//! Provider registry handler

use axum::{extract::State, Json};
use stockscan_core::ProvidersResponse;

use crate::auth::AdminCaller;
use crate::error::ApiError;
use crate::state::AppState;

/// List stock providers in match order
///
/// Earlier providers win when several match the same asset.
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    tag = "Scanning",
    responses(
        (status = 200, description = "Active providers", body = ProvidersResponse),
        (status = 401, description = "Missing token or administrative capability")
    ),
    security(
        ("admin_token" = [])
    )
)]
pub async fn providers_handler(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
) -> Result<Json<ProvidersResponse>, ApiError> {
    let providers = state.controller.providers(&caller)?;
    Ok(Json(ProvidersResponse { providers }))
}
