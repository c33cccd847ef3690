//! API error handling module
//!
//! Provides a unified error type for all API endpoints with structured error variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use stockscan_core::ScanError;
use thiserror::Error;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized - missing or invalid authentication
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable - required service is not configured or available
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Authentication error with specific error code
    #[error("{message}")]
    AuthError { message: String, code: String },

    /// Scan error - error from the scanning library
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a service unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Create an authentication error with a specific error code
    pub fn auth_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
            code: code.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::AuthError { .. } => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Scan(ref e) => match e {
                ScanError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                ScanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ScanError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ScanError::Transport(_) => StatusCode::BAD_GATEWAY,
                ScanError::InvalidPattern { .. }
                | ScanError::InvalidConfig(_)
                | ScanError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for programmatic error handling
    pub fn error_code(&self) -> &str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::AuthError { code, .. } => code,
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Scan(ref e) => match e {
                ScanError::Unauthorized(_) => "UNAUTHORIZED",
                ScanError::InvalidInput(_) => "INVALID_INPUT",
                ScanError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
                ScanError::Transport(_) => "UPSTREAM_ERROR",
                ScanError::InvalidPattern { .. } => "INVALID_PATTERN",
                ScanError::InvalidConfig(_) => "INVALID_CONFIG",
                ScanError::Export(_) => "EXPORT_ERROR",
            },
        }
    }

    /// Get sanitized error message for client response
    pub fn client_message(&self) -> String {
        match self {
            Self::Scan(ref e) => match e {
                // Operator-facing messages are returned as-is
                ScanError::Unauthorized(message) | ScanError::InvalidInput(message) => {
                    message.clone()
                }
                ScanError::StoreUnavailable(_) => e.to_string(),
                ScanError::Transport(_) => "Upstream service error".to_string(),
                ScanError::InvalidPattern { .. } | ScanError::InvalidConfig(_) => {
                    "Server misconfigured".to_string()
                }
                ScanError::Export(_) => "Export failed".to_string(),
            },
            Self::AuthError { message, .. } => message.clone(),
            // For other errors, use the Display message
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::AuthError { .. } => "auth_error",
            Self::Internal(_) => "internal",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Scan(_) => "scan",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code().to_string();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // Log based on severity, always including internal details
        match &self {
            Self::BadRequest(_) | Self::Scan(ScanError::InvalidInput(_)) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = %code,
                    error = %internal_message,
                    "Client error"
                );
            }
            Self::Unauthorized(_) | Self::AuthError { .. } | Self::Scan(ScanError::Unauthorized(_)) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = %code,
                    error = %internal_message,
                    "Authentication error"
                );
            }
            Self::ServiceUnavailable(_) | Self::Scan(ScanError::StoreUnavailable(_)) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = %code,
                    error = %internal_message,
                    "Service unavailable"
                );
            }
            Self::Internal(_) | Self::Scan(_) => {
                tracing::error!(
                    status = %status,
                    category = category,
                    code = %code,
                    error = %internal_message,
                    client_message = %client_message,
                    "Server error"
                );
            }
        }

        // All error responses include a `code` field for programmatic error handling
        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_mapping() {
        let err = ApiError::from(ScanError::invalid_input("No images selected."));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.client_message(), "No images selected.");

        let err = ApiError::from(ScanError::unauthorized("Unauthorized user"));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.client_message(), "Unauthorized user");

        let err = ApiError::from(ScanError::store_unavailable("connection refused"));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
        assert!(err.client_message().contains("connection refused"));
    }

    #[test]
    fn test_auth_error_code_passthrough() {
        let err = ApiError::auth_error("AUTH_TOKEN_EXPIRED", "JWT token has expired");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code(), "AUTH_TOKEN_EXPIRED");
        assert_eq!(err.client_message(), "JWT token has expired");
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = ApiError::from(ScanError::InvalidPattern {
            provider: "Broken".to_string(),
            message: "unclosed group".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.client_message().contains("unclosed"));
    }
}
