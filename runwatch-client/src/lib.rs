//! Runwatch HTTP Client
//!
//! A small, typed client for the Databricks Jobs API 2.1.
//!
//! Only the endpoints needed to watch and nudge job runs are covered: job
//! lookup by name, run listing, run-now, repair and run status.
//!
//! # Example
//!
//! ```no_run
//! use runwatch_client::{DatabricksClient, WorkspaceConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WorkspaceConfig::new("https://adb-123.azuredatabricks.net", "dapi...");
//!     let client = DatabricksClient::new(&config)?;
//!
//!     for job_id in client.resolve_job_ids("nightly_revenue").await? {
//!         println!("Found job: {}", job_id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod jobs;
mod runs;

#[cfg(any(test, feature = "test-util"))]
pub mod test_server;

// Re-export commonly used types
pub use config::{ConfigSources, WorkspaceConfig};
pub use error::{ClientError, Result};

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use runwatch_core::dto::error::ApiErrorBody;
use serde::de::DeserializeOwned;

/// HTTP client for the Databricks Jobs API
///
/// Methods are organized into two groups:
/// - Job lookup and run-now (`jobs.rs`)
/// - Run listing, status and repair (`runs.rs`)
#[derive(Debug, Clone)]
pub struct DatabricksClient {
    /// Workspace URL without trailing slash
    base_url: String,
    /// HTTP client carrying the bearer token
    client: Client,
}

impl DatabricksClient {
    /// Create a new client for a workspace
    ///
    /// The access token is installed as a default `Authorization` header and
    /// the configured request timeout applies to every call.
    pub fn new(config: &WorkspaceConfig) -> Result<Self> {
        config.validate()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ClientError::ConfigError("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_client(config.host.clone(), client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// The caller is responsible for authentication headers.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the workspace URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/2.1/jobs/{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Turn a failed response into an [`ClientError::ApiError`]
    ///
    /// Uses the Jobs API error body when the server sent one and falls back
    /// to the raw text otherwise.
    async fn api_error(status: u16, response: reqwest::Response) -> ClientError {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match serde_json::from_str::<ApiErrorBody>(&error_text) {
            Ok(ApiErrorBody {
                error_code,
                message: Some(message),
            }) => ClientError::api_error(status, error_code, message),
            _ => ClientError::api_error(status, None, error_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = WorkspaceConfig::new("https://example.cloud.databricks.com", "dapi-x");
        let client = DatabricksClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://example.cloud.databricks.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = DatabricksClient::with_client("https://example.com/", Client::new());
        assert_eq!(client.base_url(), "https://example.com");
        assert_eq!(
            client.url("runs/list"),
            "https://example.com/api/2.1/jobs/runs/list"
        );
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = WorkspaceConfig::new("example.com", "dapi-x");
        assert!(matches!(
            DatabricksClient::new(&config),
            Err(ClientError::ConfigError(_))
        ));
    }
}
