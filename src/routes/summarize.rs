use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::agents::SummarizerAgent;
use crate::documents::MAX_FILE_BYTES;
use crate::models::{AppState, SummaryResult, UploadRequest};
use crate::types::{AppError, AppResult};

/// Largest request body accepted: a maximum-size document base64-encoded,
/// plus headroom for the data-URI prefix, filename and JSON framing
pub const MAX_REQUEST_BODY_BYTES: usize = (MAX_FILE_BYTES as usize / 3 + 1) * 4 + 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/summarize-document", post(summarize_document))
        .route("/functions/v1/summarize-document", post(summarize_document))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

/// The body is parsed as JSON whatever `Content-Type` the caller sent.
pub async fn summarize_document(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<SummaryResult>> {
    let request = parse_upload(body)?;

    let span = info_span!("summarize_document", request_id = %Uuid::new_v4());
    SummarizerAgent::handle(request, &state.config, state.llm.as_ref())
        .instrument(span)
        .await
        .map(Json)
}

fn parse_upload(body: Result<Bytes, BytesRejection>) -> AppResult<UploadRequest> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::InvalidRequest("File too large. Maximum 20MB.".to_string())
        } else {
            AppError::InvalidRequest(format!("Invalid request body: {}", rejection.body_text()))
        }
    })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_limit_fits_maximum_upload() {
        let max_encoded = (MAX_FILE_BYTES as usize).div_ceil(3) * 4;
        assert!(MAX_REQUEST_BODY_BYTES > max_encoded);
        // Oversized-but-plausible uploads still reach validation for a JSON error
        assert!(MAX_REQUEST_BODY_BYTES > 27 * 1024 * 1024 + 1024);
    }

    #[test]
    fn test_parse_upload_reads_camel_case_fields() {
        let body = Bytes::from_static(
            br#"{"file":"data:image/png;base64,AAAA","fileName":"a.png","mimeType":"image/png"}"#,
        );
        let request = parse_upload(Ok(body)).unwrap();
        assert_eq!(request, UploadRequest::new("data:image/png;base64,AAAA", "a.png", "image/png"));
    }

    #[test]
    fn test_parse_upload_rejects_non_json() {
        let err = parse_upload(Ok(Bytes::from_static(b"file=abc"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(ref m) if m.starts_with("Invalid request body")));
    }
}
