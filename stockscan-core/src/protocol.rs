//! Request/response shapes exchanged between a scan session and the
//! batch scan controller.

use serde::{Deserialize, Serialize};

use crate::asset::{AssetRecord, MatchResult};

/// Request for the next slice of unflagged assets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScanRequest {
    /// Position in the unflagged collection to start from
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 0, minimum = 0))]
    pub offset: i64,
}

/// One scanned slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScanResponse {
    /// Every asset of the slice, matched or not
    pub results: Vec<MatchResult>,
    /// Whether unflagged assets remain past this slice
    pub has_more: bool,
    /// Unflagged asset count at the time of the request
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 25))]
    pub total: u64,
    /// Slice size the controller used; the next offset is `offset + batch_size`
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 20))]
    pub batch_size: u64,
}

impl ScanResponse {
    /// Number of results attributed to a provider.
    pub fn matched_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_match()).count()
    }
}

/// Request to mark assets as reviewed/safe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FlagRequest {
    /// Asset ids to flag
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = json!([1042, 1043])))]
    pub ids: Vec<i64>,
}

/// Outcome of a flag write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FlagResponse {
    pub success: bool,
    #[cfg_attr(feature = "openapi", schema(example = "Images flagged as safe."))]
    pub message: String,
}

/// Every asset currently carrying a safe flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SafeListResponse {
    pub results: Vec<AssetRecord>,
}

/// One provider entry of the active registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProviderSummary {
    #[cfg_attr(feature = "openapi", schema(example = "Shutterstock"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = 2))]
    pub rule_count: usize,
}

/// Providers in match order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_response_camel_case() {
        let response = ScanResponse {
            results: vec![],
            has_more: true,
            total: 25,
            batch_size: 20,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["total"], 25);
        assert_eq!(json["batchSize"], 20);
    }

    #[test]
    fn test_scan_request_defaults_offset() {
        let request: ScanRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.offset, 0);
    }
}
