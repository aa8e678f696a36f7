use async_trait::async_trait;
use crate::types::{LLMRequest, LLMResponse, AppResult};

/// A chat-completion backend able to read inline documents.
///
/// Implementations map transport and status failures onto [`crate::types::AppError`]
/// themselves so callers never see provider-specific error shapes.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}
