//! Query fan-out over a [`NewsSource`].
//!
//! Both modes keep per-query result order in the merged list and stop at the
//! first failing query. Concurrent mode uses
//! [`futures::future::try_join_all`], which drops the remaining in-flight
//! requests once one fails.

use crate::aggregate::dedup::deduplicate;
use crate::config::{SearchConfig, SearchMode};
use crate::error::SearchError;
use crate::source::NewsSource;
use crate::types::Article;

/// Run every query, merge the results and deduplicate by URL.
///
/// # Errors
///
/// Returns the first [`SearchError`] produced by any query. No partial
/// results are returned.
pub async fn gather_articles<S: NewsSource>(
    source: &S,
    queries: &[String],
    config: &SearchConfig,
) -> Result<Vec<Article>, SearchError> {
    let pages = match config.mode {
        SearchMode::Sequential => run_sequential(source, queries, config).await?,
        SearchMode::Concurrent => run_concurrent(source, queries, config).await?,
    };

    let mut merged: Vec<Article> = Vec::with_capacity(pages.iter().map(Vec::len).sum());
    for page in pages {
        merged.extend(page);
    }
    let fetched = merged.len();
    let articles = deduplicate(merged);

    tracing::info!(
        source = source.name(),
        queries = queries.len(),
        fetched,
        unique = articles.len(),
        "gathered articles"
    );
    Ok(articles)
}

async fn run_sequential<S: NewsSource>(
    source: &S,
    queries: &[String],
    config: &SearchConfig,
) -> Result<Vec<Vec<Article>>, SearchError> {
    let mut pages = Vec::with_capacity(queries.len());
    for query in queries {
        match source.search(query, config).await {
            Ok(page) => pages.push(page),
            Err(err) => {
                tracing::warn!(source = source.name(), error = %err, "search query failed");
                return Err(err);
            }
        }
    }
    Ok(pages)
}

async fn run_concurrent<S: NewsSource>(
    source: &S,
    queries: &[String],
    config: &SearchConfig,
) -> Result<Vec<Vec<Article>>, SearchError> {
    let futures = queries.iter().map(|query| source.search(query, config));
    futures::future::try_join_all(futures).await.map_err(|err| {
        tracing::warn!(source = source.name(), error = %err, "search query failed");
        err
    })
}
