//! Error types for the Jobs API client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to a workspace
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Jobs API error code, e.g. `INVALID_PARAMETER_VALUE`
        error_code: Option<String>,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Workspace configuration is missing or invalid
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, error_code: Option<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            error_code,
            message: message.into(),
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
            || matches!(self, Self::ApiError { error_code: Some(code), .. } if code == "RESOURCE_DOES_NOT_EXIST")
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = ClientError::api_error(404, None, "no such run");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.status(), Some(404));

        let err = ClientError::api_error(
            400,
            Some("RESOURCE_DOES_NOT_EXIST".to_string()),
            "Job 7 does not exist.",
        );
        assert!(err.is_not_found());

        let err = ClientError::api_error(503, None, "unavailable");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_api_error_display_keeps_message() {
        let err = ClientError::api_error(
            400,
            Some("INVALID_PARAMETER_VALUE".to_string()),
            "Number of tasks changed since the run was created",
        );
        assert_eq!(
            err.to_string(),
            "API error (status 400): Number of tasks changed since the run was created"
        );
    }
}
