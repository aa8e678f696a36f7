//! Agent System
//!
//! - **Summarizer Agent**: validates an uploaded document, asks a multimodal
//!   model for a structured summary and normalizes the reply
//!
//! ## Pipeline Overview
//!
//! ```text
//! UploadRequest
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Validate   │  → presence, size, MIME, data-URI prefix
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Prompt    │  → profile chosen by document kind (PDF / image)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Complete   │  → one upstream call, no retries
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Normalize  │  → strip fence, parse, check shape
//! └─────────────┘
//!      │
//!      ▼
//!  SummaryResult
//! ```

pub mod summarizer;

pub use summarizer::SummarizerAgent;
