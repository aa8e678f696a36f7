//! Document intake rules
//!
//! Shared by the HTTP handler and the client adapter so both sides enforce the
//! same limits:
//! - the MIME allow-list and the PDF/image split
//! - the 20 MiB ceiling, always measured in raw (decoded) bytes
//! - request validation and filename sanitization
//!
//! Prompt profiles live in [`prompts`], reply normalization in [`normalize`].

pub mod normalize;
pub mod prompts;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::UploadRequest;
use crate::types::{AppError, AppResult};

/// Largest accepted document, in raw bytes
pub const MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// MIME types accepted on both sides of the wire
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
];

/// Placeholder used when the client sends no filename
pub const DEFAULT_FILE_NAME: &str = "document";

static DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^data:[a-z]+/[-a-z0-9+.]+;base64,").unwrap());

/// Document category; selects the prompt profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Category for an allowed MIME type, `None` for anything off the allow-list
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if !is_allowed_mime(mime_type) {
            return None;
        }
        if mime_type == "application/pdf" {
            Some(DocumentKind::Pdf)
        } else {
            Some(DocumentKind::Image)
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Image => write!(f, "image"),
        }
    }
}

pub fn is_allowed_mime(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Raw byte count carried by a data URI (or bare base64 string).
///
/// Computed from the encoded length, so oversized uploads are rejected
/// without decoding them.
pub fn decoded_len(file: &str) -> u64 {
    let payload = file.split_once(',').map(|(_, p)| p).unwrap_or(file);
    let significant = payload.trim_end().trim_end_matches('=').len() as u64;
    significant * 3 / 4
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`
pub fn sanitize_file_name(file_name: Option<&str>) -> String {
    match file_name {
        Some(name) if !name.is_empty() => name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
        _ => DEFAULT_FILE_NAME.to_string(),
    }
}

/// An upload that passed every server-side check
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub data_uri: String,
    pub file_name: String,
    pub mime_type: String,
    pub kind: DocumentKind,
    pub size_bytes: u64,
}

/// Validate an upload, failing on the first violated rule.
///
/// Order: presence, size, MIME allow-list, data-URI prefix. Filename
/// sanitization never fails.
pub fn validate_upload(request: UploadRequest) -> AppResult<ValidatedUpload> {
    let (file, mime_type) = match (request.file, request.mime_type) {
        (Some(file), Some(mime)) if !file.is_empty() && !mime.is_empty() => (file, mime),
        _ => {
            return Err(AppError::InvalidRequest(
                "Missing file or mimeType".to_string(),
            ))
        }
    };

    let size_bytes = decoded_len(&file);
    if size_bytes > MAX_FILE_BYTES {
        tracing::warn!(size_bytes, "File too large");
        return Err(AppError::InvalidRequest(
            "File too large. Maximum 20MB.".to_string(),
        ));
    }

    let kind = DocumentKind::from_mime(&mime_type).ok_or_else(|| {
        tracing::warn!(mime_type = %mime_type, "Invalid MIME type");
        AppError::InvalidRequest(
            "Unsupported file type. Please upload PDF, JPG, PNG, or WEBP.".to_string(),
        )
    })?;

    if !DATA_URI_PREFIX.is_match(&file) {
        tracing::warn!("Invalid base64 format");
        return Err(AppError::InvalidRequest("Invalid file format.".to_string()));
    }

    Ok(ValidatedUpload {
        file_name: sanitize_file_name(request.file_name.as_deref()),
        data_uri: file,
        mime_type,
        kind,
        size_bytes,
    })
}
