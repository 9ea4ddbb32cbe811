//! NewsAPI `/v2/everything` source.
//!
//! Sends `q`, `pageSize`, `sortBy`, `from`, `to` (and `language` when
//! configured). The response `status` decides success: `ok` yields the
//! article list, anything else becomes [`SearchError::Api`] carrying the
//! endpoint's own message.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::build_client;
use crate::source::NewsSource;
use crate::types::{Article, SearchResponse};

/// Article source backed by the NewsAPI HTTP endpoint.
pub struct NewsApiSource {
    client: reqwest::Client,
}

impl std::fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiSource").finish_non_exhaustive()
    }
}

impl NewsApiSource {
    /// Create a source authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an empty or malformed key.
    pub fn new(api_key: &str, config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: build_client(config, api_key)?,
        })
    }
}

/// Build the query parameters for one search request.
pub fn build_query_params(query: &str, config: &SearchConfig) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.to_string()),
        ("pageSize", config.page_size.to_string()),
        ("sortBy", config.sort_by.as_param().to_string()),
        ("from", config.from.format("%Y-%m-%d").to_string()),
        ("to", config.to.format("%Y-%m-%d").to_string()),
    ];
    if let Some(language) = &config.language {
        params.push(("language", language.clone()));
    }
    params
}

/// Decode a response body into articles, honouring the `status` flag.
///
/// Non-2xx HTTP responses usually carry the same `{"status": "error"}`
/// envelope; when they do, the provider message wins over the bare status.
pub fn parse_response(http_status: u16, body: &str) -> Result<Vec<Article>, SearchError> {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(SearchResponse::Ok { articles, .. }) => Ok(articles),
        Ok(SearchResponse::Error { code, message }) => Err(SearchError::Api { code, message }),
        Err(e) if (200..300).contains(&http_status) => Err(SearchError::Parse(format!(
            "invalid search response: {e}"
        ))),
        Err(_) => Err(SearchError::Http(format!(
            "search endpoint returned HTTP {http_status}"
        ))),
    }
}

impl NewsSource for NewsApiSource {
    async fn search(&self, query: &str, config: &SearchConfig) -> Result<Vec<Article>, SearchError> {
        let url = config.everything_url()?;
        let params = build_query_params(query, config);
        tracing::debug!(%query, page_size = config.page_size, "searching news");

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("search request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("failed to read search response: {e}")))?;

        let articles = parse_response(status, &body)?;
        tracing::debug!(count = articles.len(), "search returned articles");
        Ok(articles)
    }

    fn name(&self) -> &str {
        "newsapi"
    }
}
