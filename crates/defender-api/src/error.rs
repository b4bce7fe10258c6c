//! Error types for Defender API access
//!
//! No error is swallowed and nothing is retried; every failure
//! propagates to the immediate caller.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the Defender API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or incomplete credential configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identity provider denied the grant or returned no access token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// API returned a non-success HTTP status
    #[error("API request failed: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport failure (connection, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not the JSON we expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Create an API error from an HTTP status code and response body
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        ApiError::Api {
            status,
            body: body.into(),
        }
    }

    /// Whether this error was fatal before any network call was made
    pub fn is_config(&self) -> bool {
        matches!(self, ApiError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::from_status(403, "Forbidden");
        assert_eq!(err.to_string(), "API request failed: HTTP 403: Forbidden");

        let err = ApiError::Authentication("invalid client secret".to_string());
        assert!(err.to_string().contains("invalid client secret"));
    }

    #[test]
    fn test_is_config() {
        assert!(ApiError::Config("TENANT_ID".to_string()).is_config());
        assert!(!ApiError::Network("timeout".to_string()).is_config());
    }
}
