//! Error types for the hyde-search crate.
//!
//! Messages are stable strings suitable for display. API keys never
//! appear in error text.

/// Errors that can occur while searching for articles.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The search endpoint answered with a non-`ok` status.
    ///
    /// `message` is the provider's own explanation and is surfaced verbatim.
    #[error("search API error ({code}): {message}")]
    Api {
        /// Provider error code (e.g. `apiKeyInvalid`, `rateLimited`).
        code: String,
        /// Provider error message.
        message: String,
    },

    /// An HTTP request to the search endpoint failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The search response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error came from the provider reporting a failed status.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Convenience type alias for hyde-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_api() {
        let err = SearchError::Api {
            code: "apiKeyInvalid".into(),
            message: "Your API key is invalid or incorrect.".into(),
        };
        assert_eq!(
            err.to_string(),
            "search API error (apiKeyInvalid): Your API key is invalid or incorrect."
        );
        assert!(err.is_api_error());
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
        assert!(!err.is_api_error());
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("expected value at line 1".into());
        assert_eq!(err.to_string(), "parse error: expected value at line 1");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("page_size must be between 1 and 100".into());
        assert_eq!(
            err.to_string(),
            "config error: page_size must be between 1 and 100"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
