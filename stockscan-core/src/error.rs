use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Asset store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid pattern for provider '{provider}': {message}")]
    InvalidPattern { provider: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("CSV export error: {0}")]
    Export(#[from] csv::Error),
}

impl ScanError {
    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a store unavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
