//! Wire side of the client: one POST per submission.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ErrorResponse, SummaryResult, UploadRequest};

/// A failed call to the summarize endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiFailure {
    /// HTTP status, absent when the request never got a response
    pub status: Option<u16>,
    pub message: String,
}

/// Anything able to turn an upload into a summary
#[async_trait]
pub trait SummaryApi: Send + Sync {
    async fn summarize(&self, request: &UploadRequest) -> Result<SummaryResult, ApiFailure>;
}

/// [`SummaryApi`] backed by the HTTP handler
pub struct HttpSummaryApi {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSummaryApi {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiFailure> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| ApiFailure {
            status: None,
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        })
    }

    /// Send `Authorization: Bearer` and `apikey` headers with every call
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl SummaryApi for HttpSummaryApi {
    async fn summarize(&self, request: &UploadRequest) -> Result<SummaryResult, ApiFailure> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder
                .header("Authorization", format!("Bearer {}", key))
                .header("apikey", key);
        }

        let response = builder.send().await.map_err(|e| ApiFailure {
            status: None,
            message: format!("Failed to reach summarize endpoint: {}", e),
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Summary received");
            return response.json::<SummaryResult>().await.map_err(|e| ApiFailure {
                status: Some(status.as_u16()),
                message: format!("Invalid response from server: {}", e),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
        warn!(status = status.as_u16(), error = %message, "Summarize request failed");

        Err(ApiFailure {
            status: Some(status.as_u16()),
            message,
        })
    }
}
