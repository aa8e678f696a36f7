use std::sync::Arc;

use crate::config::Config;
use crate::llm::{GatewayAdapter, LLMAdapter};
use crate::types::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn LLMAdapter>,
}

impl AppState {
    /// Build state backed by the configured chat-completion gateway
    pub fn new(config: Config) -> AppResult<Self> {
        let adapter = GatewayAdapter::from_config(&config.llm)?;
        Ok(Self {
            config,
            llm: Arc::new(adapter),
        })
    }

    /// Build state around an arbitrary adapter (stubs, alternative providers)
    pub fn with_adapter(config: Config, llm: Arc<dyn LLMAdapter>) -> Self {
        Self { config, llm }
    }
}

/// Document upload as sent by the client.
///
/// Every field is optional on the wire so that a missing value surfaces as a
/// validation error with a `{error}` body rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl UploadRequest {
    pub fn new(
        file: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            file: Some(file.into()),
            file_name: Some(file_name.into()),
            mime_type: Some(mime_type.into()),
        }
    }
}

/// Multi-length summary produced for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub short: String,
    pub medium: String,
    pub long: String,
    pub key_points: Vec<String>,
    pub improvements: Vec<String>,
    /// Any other fields the model returned, relayed as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub configured: bool,
}
