//! Error types for the dsegen library.
//!
//! One enum covers the whole pipeline because every failure here is fatal to
//! the current job — there is no partial-success mode. The variants are
//! grouped by the stage that raises them so callers at the two process
//! boundaries (CLI `main`, HTTP handler) can map them without string
//! matching:
//!
//! * configuration — missing credentials, credential-store faults
//! * input validation — bad extension, missing file, unknown format tag
//! * upstream service — the chat-completion call
//! * rendering/export — PDF printing and output writes
//!
//! Library code never calls `exit` or picks status codes; it returns
//! `Err(DsegenError)` and leaves the process-control decision to the
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the dsegen library.
#[derive(Debug, Error)]
pub enum DsegenError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// API key or default model is neither in the environment nor the keyring.
    #[error("API key or default model not set. Run 'dsegen config' first.")]
    MissingCredentials,

    /// The OS keyring rejected a read or write.
    #[error("Credential store error: {detail}")]
    CredentialStore { detail: String },

    // ── Input-validation errors ───────────────────────────────────────────
    /// Output path does not end in .md, .html, or .pdf.
    #[error("Unsupported output format: '{extension}'. Supported: .md, .html, .pdf")]
    UnsupportedOutput { extension: String },

    /// Markdown input file was not found at the given path.
    #[error("Input file not found: '{path}'")]
    InputFileNotFound { path: PathBuf },

    /// Could not read the markdown input file.
    #[error("Failed to read input file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request body carried a format tag outside {plain, markdown, html}.
    #[error("Unsupported input format: '{format}'. Supported formats: plain, markdown, html")]
    UnknownInputFormat { format: String },

    /// Query parameter carried an output value outside {markdown, html, pdf}.
    #[error("Unsupported output format: '{format}'. Supported formats: markdown, html, pdf")]
    UnknownOutputFormat { format: String },

    // ── Upstream-service errors ───────────────────────────────────────────
    /// Could not reach the chat-completion endpoint at all.
    #[error("Failed to connect to OpenRouter API: {reason}")]
    ConnectionFailed { reason: String },

    /// The endpoint answered HTTP 429.
    #[error("OpenRouter API request exceeded rate limit")]
    RateLimited,

    /// The endpoint answered with a non-success status or an error body.
    #[error("OpenRouter API returned an API error: {message}")]
    ApiError { message: String },

    /// A 200 response carried zero completion choices.
    #[error("OpenRouter API returned no completion choices")]
    EmptyCompletion,

    // ── Rendering / export errors ─────────────────────────────────────────
    /// The headless browser failed to launch or print.
    #[error("PDF export failed: {detail}")]
    PdfExportFailed { detail: String },

    /// Could not create or write the output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DsegenError {
    /// True for errors the caller caused (4xx territory), false for
    /// everything the server or an upstream service got wrong (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DsegenError::UnknownInputFormat { .. }
                | DsegenError::UnknownOutputFormat { .. }
                | DsegenError::UnsupportedOutput { .. }
        )
    }
}
