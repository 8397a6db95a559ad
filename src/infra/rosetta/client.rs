//! HTTP client for a Rosetta API server.
//!
//! Used by the readiness probe to call this server's own network endpoints
//! through the full HTTP stack.

use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, instrument};

use crate::domain::rosetta::{
    self, MetadataRequest, NetworkIdentifier, NetworkListResponse, NetworkRequest,
    NetworkStatusResponse,
};
use crate::domain::{AppError, ExternalServiceError};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rosetta API client
#[derive(Debug, Clone)]
pub struct RosettaHttpClient {
    http_client: Client,
    base_url: String,
}

impl RosettaHttpClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("readiness-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client for a server on this host
    pub fn localhost(port: u16, timeout: Duration) -> Result<Self, AppError> {
        Self::new(format!("http://localhost:{}", port), timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    pub async fn network_list(&self) -> Result<NetworkListResponse, AppError> {
        self.post("/network/list", &MetadataRequest::default()).await
    }

    #[instrument(skip(self))]
    pub async fn network_status(
        &self,
        network_identifier: NetworkIdentifier,
    ) -> Result<NetworkStatusResponse, AppError> {
        self.post("/network/status", &NetworkRequest::new(network_identifier))
            .await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, AppError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Calling Rosetta API");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::ExternalService(ExternalServiceError::Timeout(e.to_string()))
                } else {
                    AppError::ExternalService(ExternalServiceError::Network(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Rosetta servers answer failures with an error object; keep its
            // message when the body is one.
            let message = serde_json::from_str::<rosetta::Error>(&body)
                .map(|e| format!("{} (code {})", e.message, e.code))
                .unwrap_or(body);
            error!(status = %status, url = %url, message = %message, "Rosetta API returned error");
            return Err(AppError::ExternalService(ExternalServiceError::ApiError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json::<R>().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to parse Rosetta API response");
            AppError::ExternalService(ExternalServiceError::ParseError(e.to_string()))
        })
    }
}
