//! Trait definition for pluggable article sources.
//!
//! [`NewsApiSource`](crate::newsapi::NewsApiSource) is the production
//! implementation; tests substitute in-memory sources.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::Article;

/// A backend that turns one query into one page of articles.
///
/// Implementations handle their own request construction and response
/// decoding, and must report a failed endpoint status as
/// [`SearchError::Api`] rather than an empty page.
///
/// All implementations must be `Send + Sync` so queries can run concurrently.
pub trait NewsSource: Send + Sync {
    /// Run a single search and return the articles in endpoint order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the response cannot be
    /// decoded, or the endpoint reports a non-`ok` status.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<Article>, SearchError>> + Send;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
