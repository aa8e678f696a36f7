// OpenAI-compatible chat-completion gateway adapter
// Any endpoint exposing POST {base}/chat/completions with bearer auth and
// image_url content parts works here (Lovable AI gateway, OpenRouter, ...).

use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub struct GatewayAdapter {
    client: Client,
    api_key: Option<String>,
    api_base: String,
}

// Request types for the gateway API
#[derive(Serialize)]
struct GatewayChatRequest<'a> {
    model: &'a str,
    messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

// Response types for the gateway API
#[derive(Deserialize)]
struct GatewayChatResponse {
    #[serde(default)]
    choices: Vec<GatewayChoice>,
    #[serde(default)]
    usage: Option<GatewayUsage>,
}

#[derive(Deserialize)]
struct GatewayChoice {
    message: GatewayResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GatewayResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GatewayUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl GatewayAdapter {
    /// Create an adapter whose requests are bounded by `timeout`
    pub fn new(api_key: Option<String>, api_base: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Self::new(
            config.active_api_key().map(str::to_string),
            &config.api_base,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl LLMAdapter for GatewayAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::NotConfigured("LLM_API_KEY".to_string()))?;

        let body = GatewayChatRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::LLMApi("Gateway request timed out".to_string())
                } else {
                    AppError::LLMApi(format!("Gateway request failed: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %error_text, "AI gateway error");
            return Err(AppError::from_upstream_status(status.as_u16()));
        }

        let gateway_response: GatewayChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to parse gateway response: {}", e)))?;

        let choice = gateway_response
            .choices
            .into_iter()
            .next()
            .ok_or(AppError::EmptyReply)?;

        let content = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(AppError::EmptyReply)?;

        let usage = gateway_response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        debug!(total_tokens = usage.total_tokens, "Gateway completion received");

        Ok(LLMResponse {
            content,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn request() -> LLMRequest {
        LLMRequest {
            model: "google/gemini-2.5-pro".to_string(),
            messages: vec![LLMMessage::user_with_document(
                "Summarize this",
                "data:image/png;base64,iVBORw0KGgo=",
            )],
            max_tokens: Some(4000),
            temperature: Some(0.1),
        }
    }

    fn adapter(base: &str) -> GatewayAdapter {
        GatewayAdapter::new(Some("test-key".to_string()), base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let adapter = adapter("https://example.test/v1/");
        assert_eq!(adapter.completions_url(), "https://example.test/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_sends_bearer_and_sampling_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "google/gemini-2.5-pro",
                "temperature": 0.1,
                "max_tokens": 4000,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "Summarize this"},
                        {"type": "image_url", "image_url": {"url": "data:image/png;base64,iVBORw0KGgo="}}
                    ]
                }]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"hello"},"finish_reason":"stop"}],"usage":{"prompt_tokens":3,"completion_tokens":1,"total_tokens":4}}"#)
            .create_async()
            .await;

        let response = adapter(&server.url())
            .create_chat_completion(&request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "hello");
        assert_eq!(response.usage.total_tokens, 4);
    }

    #[tokio::test]
    async fn test_maps_rate_limit_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = adapter(&server.url())
            .create_chat_completion(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RateLimited));
    }

    #[tokio::test]
    async fn test_maps_unknown_status_to_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(502)
            .create_async()
            .await;

        let err = adapter(&server.url())
            .create_chat_completion(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamStatus { status: 502 }));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_reply() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .create_async()
            .await;

        let err = adapter(&server.url())
            .create_chat_completion(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyReply));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let adapter = GatewayAdapter::new(None, "http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = adapter.create_chat_completion(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(_)));
    }
}
