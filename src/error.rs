//! Error types for hyde-rag.
//!
//! Each variant carries a stable error code (SCREAMING_SNAKE_CASE) that is
//! included in the Display output and accessible via [`RagError::code()`].
//! Any error aborts the whole run; nothing is retried.

use hyde_search::SearchError;

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Model reply did not match the expected JSON shape.
    pub const MALFORMED_OUTPUT: &str = "MALFORMED_OUTPUT";

    /// News search failed or reported a non-`ok` status.
    pub const SEARCH_FAILED: &str = "SEARCH_FAILED";

    /// Request to the model provider could not be completed.
    pub const REQUEST_FAILED: &str = "REQUEST_FAILED";

    /// Provider answered with an error status or an unusable body.
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

    /// Authentication failed (invalid/missing API key).
    pub const AUTH_FAILED: &str = "AUTH_FAILED";

    /// Streaming response encountered an error.
    pub const STREAM_FAILED: &str = "STREAM_FAILED";

    /// Invalid or missing configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Embedding count or dimension mismatch.
    pub const EMBEDDING_MISMATCH: &str = "EMBEDDING_MISMATCH";
}

/// Errors produced by the pipeline and its providers.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    /// Model reply did not match the expected JSON shape.
    #[error("[{}] {}", error_codes::MALFORMED_OUTPUT, .0)]
    MalformedOutput(String),

    /// News search failed.
    #[error("[{}] {}", error_codes::SEARCH_FAILED, .0)]
    Search(#[from] SearchError),

    /// Request to the model provider could not be completed.
    #[error("[{}] {}", error_codes::REQUEST_FAILED, .0)]
    Request(String),

    /// Provider answered with an error status or an unusable body.
    #[error("[{}] {}", error_codes::PROVIDER_ERROR, .0)]
    Provider(String),

    /// Authentication failed.
    #[error("[{}] {}", error_codes::AUTH_FAILED, .0)]
    Auth(String),

    /// Streaming response encountered an error.
    #[error("[{}] {}", error_codes::STREAM_FAILED, .0)]
    Stream(String),

    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// Embedding count or dimension mismatch.
    #[error("[{}] {}", error_codes::EMBEDDING_MISMATCH, .0)]
    Embedding(String),
}

impl RagError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedOutput(_) => error_codes::MALFORMED_OUTPUT,
            Self::Search(_) => error_codes::SEARCH_FAILED,
            Self::Request(_) => error_codes::REQUEST_FAILED,
            Self::Provider(_) => error_codes::PROVIDER_ERROR,
            Self::Auth(_) => error_codes::AUTH_FAILED,
            Self::Stream(_) => error_codes::STREAM_FAILED,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Embedding(_) => error_codes::EMBEDDING_MISMATCH,
        }
    }

    /// Returns the message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Search(e) => e.to_string(),
            Self::MalformedOutput(m)
            | Self::Request(m)
            | Self::Provider(m)
            | Self::Auth(m)
            | Self::Stream(m)
            | Self::Config(m)
            | Self::Embedding(m) => m.clone(),
        }
    }
}

impl From<std::io::Error> for RagError {
    fn from(e: std::io::Error) -> Self {
        Self::Config(format!("I/O error: {e}"))
    }
}

/// Convenience alias for hyde-rag results.
pub type Result<T> = std::result::Result<T, RagError>;
