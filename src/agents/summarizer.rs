//! Summarizer Agent
//!
//! Validates an upload, picks the prompt profile for its document category,
//! makes one completion call and normalizes the reply into a summary.
//! Nothing is retried: every failure surfaces to the caller as an [`AppError`].

use crate::config::Config;
use crate::documents::normalize::normalize_reply;
use crate::documents::prompts::profile_for;
use crate::documents::{validate_upload, ValidatedUpload};
use crate::llm::LLMAdapter;
use crate::models::{SummaryResult, UploadRequest};
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest};
use tracing::{debug, error, info};

/// Low temperature keeps factual extraction from drifting
pub const SUMMARY_TEMPERATURE: f32 = 0.1;
pub const SUMMARY_MAX_TOKENS: u32 = 4000;

const REPLY_PREVIEW_CHARS: usize = 200;

pub struct SummarizerAgent;

impl SummarizerAgent {
    /// Handle one upload end to end
    pub async fn handle(
        request: UploadRequest,
        config: &Config,
        llm: &dyn LLMAdapter,
    ) -> AppResult<SummaryResult> {
        if config.llm.active_api_key().is_none() {
            return Err(AppError::NotConfigured("LLM_API_KEY".to_string()));
        }

        let upload = validate_upload(request)?;
        info!(
            file_name = %upload.file_name,
            mime_type = %upload.mime_type,
            kind = %upload.kind,
            size_bytes = upload.size_bytes,
            "Processing document"
        );

        let completion = Self::build_request(&upload, config);
        let response = llm.create_chat_completion(&completion).await?;

        debug!(
            preview = %preview(&response.content),
            finish_reason = %response.finish_reason,
            "AI response received, parsing"
        );

        let summary = normalize_reply(&response.content).map_err(|e| {
            error!(error = %e, content = %response.content, "Failed to parse AI response");
            AppError::MalformedReply(e.to_string())
        })?;

        info!(
            key_points = summary.key_points.len(),
            improvements = summary.improvements.len(),
            "Summary generated"
        );
        Ok(summary)
    }

    /// Completion request for a validated upload
    pub fn build_request(upload: &ValidatedUpload, config: &Config) -> LLMRequest {
        let profile = profile_for(upload.kind);

        LLMRequest {
            model: config.llm.model.clone(),
            messages: vec![LLMMessage::user_with_document(
                profile.render(),
                upload.data_uri.clone(),
            )],
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            temperature: Some(SUMMARY_TEMPERATURE),
        }
    }
}

fn preview(content: &str) -> &str {
    match content.char_indices().nth(REPLY_PREVIEW_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
