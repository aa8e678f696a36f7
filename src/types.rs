// Type definitions and enums

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorResponse;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Content part for multimodal messages (text, images, etc.)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    /// Inline document reference; the url may be a data URI
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>, // "low", "high", or "auto"
}

/// Message content - can be simple text or multimodal (text + images)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Multimodal(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the text content (for simple text or first text part in multimodal)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s),
            MessageContent::Multimodal(parts) => parts.iter().find_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: MessageContent,
}

impl LLMMessage {
    /// Create a user message with an inline document (for vision models)
    pub fn user_with_document(text: impl Into<String>, data_uri: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Multimodal(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: data_uri.into(),
                        detail: None,
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

pub const RATE_LIMIT_MESSAGE: &str =
    "Rate limit exceeded. Please wait 2-3 minutes before trying again.";
pub const CREDITS_EXHAUSTED_MESSAGE: &str =
    "AI credits exhausted. Please add credits to your workspace.";
pub const FORMAT_REJECTED_MESSAGE: &str =
    "This file format couldn't be processed. Try converting to JPG/PNG images.";
pub const MALFORMED_REPLY_MESSAGE: &str = "AI returned invalid format. Please try again.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process document";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("Upstream rate limit exceeded")]
    RateLimited,

    #[error("Upstream credits exhausted")]
    CreditsExhausted,

    #[error("Upstream rejected the document format")]
    FormatRejected,

    #[error("AI processing failed with status {status}")]
    UpstreamStatus { status: u16 },

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("No response from AI")]
    EmptyReply,

    #[error("Malformed AI reply: {0}")]
    MalformedReply(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a non-success status from the completion endpoint
    pub fn from_upstream_status(status: u16) -> Self {
        match status {
            429 => AppError::RateLimited,
            402 => AppError::CreditsExhausted,
            400 => AppError::FormatRejected,
            _ => AppError::UpstreamStatus { status },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::FormatRejected => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::CreditsExhausted => StatusCode::PAYMENT_REQUIRED,
            AppError::NotConfigured(_)
            | AppError::UpstreamStatus { .. }
            | AppError::LLMApi(_)
            | AppError::EmptyReply
            | AppError::MalformedReply(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to the caller; upstream detail stays in the log
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidRequest(message) => message.clone(),
            AppError::NotConfigured(_) | AppError::EmptyReply => self.to_string(),
            AppError::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            AppError::CreditsExhausted => CREDITS_EXHAUSTED_MESSAGE.to_string(),
            AppError::FormatRejected => FORMAT_REJECTED_MESSAGE.to_string(),
            AppError::MalformedReply(_) => MALFORMED_REPLY_MESSAGE.to_string(),
            AppError::UpstreamStatus { .. } | AppError::LLMApi(_) | AppError::Internal(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidRequest(_) => tracing::debug!("Client error: {}", self),
            AppError::RateLimited | AppError::CreditsExhausted | AppError::FormatRejected => {
                tracing::warn!("Upstream refused request: {}", self)
            }
            _ => tracing::error!("Error processing document: {}", self),
        }

        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_mapping() {
        assert_eq!(
            AppError::from_upstream_status(429).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::from_upstream_status(402).status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            AppError::from_upstream_status(400).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from_upstream_status(503).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_status_not_leaked_to_user() {
        let err = AppError::from_upstream_status(503);
        assert!(err.to_string().contains("503"));
        assert!(!err.user_message().contains("503"));
    }

    #[test]
    fn test_document_message_serialization() {
        let msg = LLMMessage::user_with_document("Summarize", "data:image/png;base64,AAAA");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(json["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert!(json["content"][1]["image_url"].get("detail").is_none());
        assert_eq!(msg.content.as_text(), Some("Summarize"));
    }
}
