//! # hyde-search
//!
//! News article retrieval for hyde-rag.
//!
//! Runs a batch of search queries against a news endpoint, merges the
//! returned articles and removes duplicates by URL. The production source
//! is NewsAPI's `/v2/everything`; anything implementing [`NewsSource`]
//! can stand in for it.
//!
//! ## Design
//!
//! - One request per query; sequential by default, concurrent on request
//! - A non-`ok` response status is fatal for the whole batch
//! - Duplicate URLs collapse to the last-seen article, in first-seen position
//!
//! ## Security
//!
//! - The API key travels in the `X-Api-Key` header, never the query string
//! - The header is marked sensitive and is never logged
//! - Query text is logged only at debug level

pub mod aggregate;
pub mod config;
pub mod error;
pub mod http;
pub mod newsapi;
pub mod source;
pub mod types;

pub use aggregate::dedup::deduplicate;
pub use aggregate::gather::gather_articles;
pub use config::{SearchConfig, SearchMode};
pub use error::{Result, SearchError};
pub use newsapi::NewsApiSource;
pub use source::NewsSource;
pub use types::{Article, ArticleSource, SearchResponse, SortBy};

/// Search NewsAPI for every query and return the merged, deduplicated set.
///
/// Validates `config`, builds a [`NewsApiSource`] with `api_key`, then runs
/// [`gather_articles`].
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid config or key, and the
/// first query failure otherwise.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> hyde_search::Result<()> {
/// let config = hyde_search::SearchConfig::default();
/// let queries = vec!["solar storms".to_string(), "aurora forecast".to_string()];
/// let articles = hyde_search::search_news("my-key", &queries, &config).await?;
/// for article in &articles {
///     println!("{}: {}", article.title, article.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_news(
    api_key: &str,
    queries: &[String],
    config: &SearchConfig,
) -> Result<Vec<Article>> {
    config.validate()?;
    let source = NewsApiSource::new(api_key, config)?;
    gather_articles(&source, queries, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_news_rejects_invalid_config() {
        let config = SearchConfig {
            page_size: 0,
            ..Default::default()
        };
        let result = search_news("key", &["q".into()], &config).await;
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[tokio::test]
    async fn search_news_rejects_missing_key() {
        let result = search_news("", &["q".into()], &SearchConfig::default()).await;
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[test]
    fn public_types_accessible() {
        let _config = SearchConfig::default();
        let _mode = SearchMode::Concurrent;
        let _sort = SortBy::Popularity;
        let _article = Article::new("t", "d", "c", "https://u.com");
        let _err = SearchError::Parse("test".into());
    }
}
