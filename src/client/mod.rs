//! Client Submission Adapter
//!
//! Collects one document at a time, validates it locally, encodes it as a
//! data URI and sends it to the summarize endpoint.
//!
//! ```text
//!   Idle ──select──▶ PendingFile ──submit──▶ Processing ──▶ Result
//!    ▲                    ▲                                └─▶ Error
//!    └──────reset─────────┴──────────select (new file)─────────┘
//! ```
//!
//! The whole lifecycle is one [`AdapterState`] value, so a result and an
//! error can never be held at the same time, and a second submission cannot
//! start while one is `Processing`.

pub mod render;
pub mod transport;

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;
use tracing::{info, warn};

use crate::documents::{is_allowed_mime, MAX_FILE_BYTES};
use crate::models::{SummaryResult, UploadRequest};
pub use transport::{ApiFailure, HttpSummaryApi, SummaryApi};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A file the user picked, not yet read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileCandidate {
    /// Inspect a file on disk; the MIME type is guessed from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime_type,
            size: metadata.len(),
        })
    }

    /// Size in MiB, for display
    pub fn size_mib(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }
}

/// Why a candidate file was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("file is {size} bytes, limit is 20 MiB")]
    TooLarge { size: u64 },

    #[error("unsupported MIME type {mime_type}")]
    UnsupportedType { mime_type: String },

    #[error("a document is already being processed")]
    Busy,
}

impl SelectError {
    pub fn title(&self) -> &'static str {
        match self {
            SelectError::TooLarge { .. } => "File Too Large",
            SelectError::UnsupportedType { .. } => "Unsupported File Type",
            SelectError::Busy => "Busy",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SelectError::TooLarge { .. } => "Please upload a file smaller than 20MB",
            SelectError::UnsupportedType { .. } => {
                "Please upload a PDF or image file (JPG, PNG, WEBP)"
            }
            SelectError::Busy => "Wait for the current document to finish processing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no file selected")]
    NoPendingFile,

    #[error("a submission is already in flight")]
    AlreadyProcessing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    RateLimited,
    CreditsExhausted,
    UnsupportedFormat,
    FileRead,
    Generic,
}

/// User-facing description of a failed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFailure {
    pub category: ErrorCategory,
    pub title: String,
    pub message: String,
}

const GENERIC_CLIENT_MESSAGE: &str = "Failed to process document. Please try again.";

impl ClientFailure {
    /// Pick a tailored message from the status and the server's error text
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        let lower = message.to_lowercase();

        if status == Some(429) || lower.contains("rate limit") {
            Self::new(
                ErrorCategory::RateLimited,
                "Too Many Requests",
                "Rate limit reached.\n\nPlease wait 2-3 minutes before trying again. The free tier has limited requests per minute.",
            )
        } else if status == Some(402) || lower.contains("credit") {
            Self::new(
                ErrorCategory::CreditsExhausted,
                "Credits Exhausted",
                "AI credits exhausted.\n\nAdd credits to your workspace to continue.",
            )
        } else if status == Some(400) && lower.contains("format") {
            Self::new(
                ErrorCategory::UnsupportedFormat,
                "Unsupported Format",
                "This file format couldn't be processed. Try converting your PDF to images (JPG/PNG) first.",
            )
        } else if message.trim().is_empty() {
            Self::new(ErrorCategory::Generic, "Error", GENERIC_CLIENT_MESSAGE)
        } else {
            Self::new(ErrorCategory::Generic, "Error", message)
        }
    }

    pub fn file_read() -> Self {
        Self::new(
            ErrorCategory::FileRead,
            "File Error",
            "Failed to read file. Please try again.",
        )
    }

    fn new(category: ErrorCategory, title: &str, message: &str) -> Self {
        Self {
            category,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    /// First line of the message, for short notifications
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl From<ApiFailure> for ClientFailure {
    fn from(failure: ApiFailure) -> Self {
        Self::classify(failure.status, &failure.message)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdapterState {
    #[default]
    Idle,
    PendingFile(FileCandidate),
    Processing(FileCandidate),
    Result {
        file: FileCandidate,
        summary: SummaryResult,
    },
    Error {
        file: FileCandidate,
        failure: ClientFailure,
    },
}

impl AdapterState {
    pub fn is_processing(&self) -> bool {
        matches!(self, AdapterState::Processing(_))
    }

    /// The file this state refers to, if any
    pub fn file(&self) -> Option<&FileCandidate> {
        match self {
            AdapterState::Idle => None,
            AdapterState::PendingFile(file)
            | AdapterState::Processing(file)
            | AdapterState::Result { file, .. }
            | AdapterState::Error { file, .. } => Some(file),
        }
    }
}

/// Encode raw bytes as a `data:<mime>;base64,` URI
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

/// An in-flight submission, detached from the adapter so the caller can keep
/// observing the `Processing` state while it runs
#[derive(Debug, Clone)]
pub struct Submission {
    file: FileCandidate,
}

impl Submission {
    /// Read and encode the file, then make exactly one call to `api`
    pub async fn run<A>(&self, api: &A) -> Result<SummaryResult, ClientFailure>
    where
        A: SummaryApi + ?Sized,
    {
        let bytes = tokio::fs::read(&self.file.path).await.map_err(|e| {
            warn!(error = %e, path = %self.file.path.display(), "Failed to read file");
            ClientFailure::file_read()
        })?;

        let request = UploadRequest::new(
            encode_data_uri(&self.file.mime_type, &bytes),
            self.file.name.clone(),
            self.file.mime_type.clone(),
        );

        api.summarize(&request).await.map_err(ClientFailure::from)
    }
}

/// Single-flight submission state machine
#[derive(Debug, Default)]
pub struct SubmissionAdapter {
    state: AdapterState,
}

impl SubmissionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AdapterState {
        &self.state
    }

    /// Accept a candidate as the pending upload.
    ///
    /// A rejected candidate leaves the current state untouched.
    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<(), SelectError> {
        if self.state.is_processing() {
            return Err(SelectError::Busy);
        }
        if candidate.size > MAX_FILE_BYTES {
            return Err(SelectError::TooLarge {
                size: candidate.size,
            });
        }
        if !is_allowed_mime(&candidate.mime_type) {
            return Err(SelectError::UnsupportedType {
                mime_type: candidate.mime_type,
            });
        }

        info!(file_name = %candidate.name, size = candidate.size, "File selected");
        self.state = AdapterState::PendingFile(candidate);
        Ok(())
    }

    /// Enter `Processing` and hand out the work to run.
    ///
    /// Allowed from `PendingFile`, and from `Error` to resubmit the same file.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitError> {
        let file = match &self.state {
            AdapterState::PendingFile(file) | AdapterState::Error { file, .. } => file.clone(),
            AdapterState::Processing(_) => return Err(SubmitError::AlreadyProcessing),
            AdapterState::Idle | AdapterState::Result { .. } => {
                return Err(SubmitError::NoPendingFile)
            }
        };

        self.state = AdapterState::Processing(file.clone());
        Ok(Submission { file })
    }

    /// Record the outcome of the in-flight submission.
    ///
    /// Returns `false` when nothing is processing (the adapter was reset in
    /// the meantime); the outcome is dropped.
    pub fn finish(&mut self, outcome: Result<SummaryResult, ClientFailure>) -> bool {
        let file = match std::mem::take(&mut self.state) {
            AdapterState::Processing(file) => file,
            other => {
                self.state = other;
                warn!("Dropping outcome of a submission that is no longer current");
                return false;
            }
        };

        self.state = match outcome {
            Ok(summary) => AdapterState::Result { file, summary },
            Err(failure) => AdapterState::Error { file, failure },
        };
        true
    }

    /// Submit the pending file and wait for the outcome
    pub async fn submit<A>(&mut self, api: &A) -> Result<&AdapterState, SubmitError>
    where
        A: SummaryApi + ?Sized,
    {
        let submission = self.begin_submit()?;
        let outcome = submission.run(api).await;
        self.finish(outcome);
        Ok(&self.state)
    }

    pub fn reset(&mut self) {
        self.state = AdapterState::Idle;
    }
}
