//! Error types for the database module.

use stockscan_core::ScanError;
use thiserror::Error;

/// Errors that can occur when interacting with the asset database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection failed
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// SQL query execution failed
    #[error("Query error: {0}")]
    Query(String),

    /// Value does not fit the database column type
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Query(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(e.to_string())
    }
}

impl From<StoreError> for ScanError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidInput(message) => ScanError::InvalidInput(message),
            other => ScanError::StoreUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_store_unavailable() {
        let err: ScanError = StoreError::Query("relation does not exist".to_string()).into();
        match err {
            ScanError::StoreUnavailable(message) => {
                assert!(message.contains("relation does not exist"))
            }
            other => panic!("Expected StoreUnavailable, got: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_passes_through() {
        let err: ScanError = StoreError::InvalidInput("offset too large".to_string()).into();
        assert!(matches!(err, ScanError::InvalidInput(_)));
    }
}
