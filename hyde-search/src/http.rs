//! Shared HTTP client for search endpoint requests.
//!
//! Provides a configured [`reqwest::Client`] that authenticates every
//! request with the `X-Api-Key` header.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// User-Agent sent with every search request.
pub const USER_AGENT: &str = concat!("hyde-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for the search endpoint.
///
/// The client has:
/// - Timeout from config
/// - `X-Api-Key` and `Accept: application/json` default headers
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the key is empty or not a valid
/// header value, and [`SearchError::Http`] if the client cannot be built.
pub fn build_client(config: &SearchConfig, api_key: &str) -> Result<reqwest::Client, SearchError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(SearchError::Config("missing news API key".into()));
    }

    let mut headers = HeaderMap::new();
    let mut key_value = HeaderValue::from_str(key)
        .map_err(|_| SearchError::Config("news API key is not a valid header value".into()))?;
    key_value.set_sensitive(true);
    headers.insert("X-Api-Key", key_value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_default_config() {
        let config = SearchConfig::default();
        assert!(build_client(&config, "test-key").is_ok());
    }

    #[test]
    fn empty_key_rejected() {
        let config = SearchConfig::default();
        let err = build_client(&config, "   ").unwrap_err();
        assert!(err.to_string().contains("missing news API key"));
    }

    #[test]
    fn key_with_newline_rejected() {
        let config = SearchConfig::default();
        let err = build_client(&config, "abc\ndef").unwrap_err();
        assert!(err.to_string().contains("header value"));
    }

    #[test]
    fn user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("hyde-search/"));
    }
}
