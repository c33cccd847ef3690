//! Request validation module
//!
//! Provides validation utilities for scan and flag request bodies.

use crate::error::ApiError;

/// Maximum number of asset ids accepted by one flag request
pub const MAX_FLAG_IDS: usize = 1000;

/// Validates a scan offset and converts it to the controller's unsigned form
///
/// Returns an error if the offset is negative.
pub fn validate_offset(offset: i64) -> Result<u64, ApiError> {
    u64::try_from(offset).map_err(|_| {
        ApiError::bad_request(format!("Offset must not be negative (got {})", offset))
    })
}

/// Validates the number of ids in a flag request
///
/// An empty list is left to the controller, which reports it as
/// "No images selected.".
pub fn validate_flag_ids(ids: &[i64]) -> Result<(), ApiError> {
    if ids.len() > MAX_FLAG_IDS {
        Err(ApiError::bad_request(format!(
            "Too many ids: {} exceeds maximum of {} per request",
            ids.len(),
            MAX_FLAG_IDS
        )))
    } else {
        Ok(())
    }
}
