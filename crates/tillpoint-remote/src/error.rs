//! # Remote Error Types
//!
//! Error types for backend calls and configuration loading.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Remote Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Api {status}           │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  DeserializationFailed  │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The backend could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The backend did not answer in time.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    DeserializationFailed(String),
}

impl RemoteError {
    /// True for failures where the request may never have reached the
    /// backend. Catalog loading retries these; nothing else does.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::ConnectionFailed(_) | RemoteError::Timeout(_) => true,
            RemoteError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for RemoteError {
    fn from(err: url::ParseError) -> Self {
        RemoteError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::DeserializationFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RemoteError {
    fn from(err: toml::de::Error) -> Self {
        RemoteError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RemoteError {
    fn from(err: toml::ser::Error) -> Self {
        RemoteError::ConfigSaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for RemoteError {
    fn from(err: std::io::Error) -> Self {
        RemoteError::ConfigLoadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(RemoteError::Timeout(10).is_transient());
        assert!(RemoteError::ConnectionFailed("refused".into()).is_transient());
        assert!(RemoteError::Api {
            status: 503,
            message: "busy".into()
        }
        .is_transient());
        assert!(!RemoteError::Api {
            status: 422,
            message: "bad".into()
        }
        .is_transient());
        assert!(!RemoteError::DeserializationFailed("x".into()).is_transient());
    }

    #[test]
    fn test_api_error_message() {
        let err = RemoteError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Backend returned 500: boom");
    }
}
