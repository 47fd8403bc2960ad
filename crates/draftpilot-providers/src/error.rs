//! Error types for the provider capability

use thiserror::Error;

/// Errors that can occur when configuring or calling a completion provider
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ProviderError {
    /// Configuration error (missing endpoint, missing model, ...)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Network error occurred
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider-reported error (HTTP status, provider failure payload)
    #[error("Provider error: {0}")]
    ApiError(String),

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::ApiError("Request timeout".to_string())
        } else if err.is_connect() {
            ProviderError::NetworkError(err.to_string())
        } else {
            ProviderError::ApiError(err.to_string())
        }
    }
}
