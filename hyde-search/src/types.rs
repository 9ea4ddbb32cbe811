//! Core types for news articles and search responses.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single news article returned by the search endpoint.
///
/// `title`, `description` and `content` are always present as strings;
/// the endpoint may send `null` for any of them, which decodes to `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Headline.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Short summary supplied by the publisher.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Truncated body snippet.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Canonical link. Unique within a merged result set.
    pub url: String,
    /// Publishing outlet.
    #[serde(default)]
    pub source: Option<ArticleSource>,
    /// Byline, when the publisher provides one.
    #[serde(default)]
    pub author: Option<String>,
    /// Lead image link.
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// Publication timestamp as sent by the endpoint (RFC 3339).
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Article {
    /// Build an article with just the fields the pipeline relies on.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            content: content.into(),
            url: url.into(),
            source: None,
            author: None,
            url_to_image: None,
            published_at: None,
        }
    }
}

/// The outlet an article was published by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    /// Endpoint-assigned identifier, absent for smaller outlets.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
}

/// Sort order requested from the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Articles most closely related to the query first.
    #[default]
    Relevancy,
    /// Articles from popular sources first.
    Popularity,
    /// Newest articles first.
    PublishedAt,
}

impl SortBy {
    /// The wire value sent as the `sortBy` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Relevancy => "relevancy",
            Self::Popularity => "popularity",
            Self::PublishedAt => "publishedAt",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Envelope returned by the `/v2/everything` endpoint.
///
/// The `status` field selects the variant; anything other than `ok` or
/// `error` fails to decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SearchResponse {
    /// Successful search.
    Ok {
        /// Total hits on the endpoint side (may exceed `articles.len()`).
        #[serde(rename = "totalResults", default)]
        total_results: u64,
        /// The requested page of articles.
        #[serde(default)]
        articles: Vec<Article>,
    },
    /// Failed search.
    Error {
        /// Machine-readable error code.
        #[serde(default)]
        code: String,
        /// Human-readable error message.
        #[serde(default)]
        message: String,
    },
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_new_leaves_metadata_empty() {
        let article = Article::new("Title", "Desc", "Body", "https://a.com");
        assert_eq!(article.title, "Title");
        assert_eq!(article.url, "https://a.com");
        assert!(article.source.is_none());
        assert!(article.published_at.is_none());
    }

    #[test]
    fn article_decodes_null_text_fields_as_empty() {
        let json = r#"{
            "source": {"id": null, "name": "Example Wire"},
            "author": null,
            "title": "Headline",
            "description": null,
            "url": "https://example.com/story",
            "urlToImage": null,
            "publishedAt": "2023-06-12T10:00:00Z",
            "content": null
        }"#;
        let article: Article = serde_json::from_str(json).expect("decode");
        assert_eq!(article.title, "Headline");
        assert_eq!(article.description, "");
        assert_eq!(article.content, "");
        assert_eq!(
            article.source.as_ref().map(|s| s.name.as_str()),
            Some("Example Wire")
        );
        assert_eq!(article.published_at.as_deref(), Some("2023-06-12T10:00:00Z"));
    }

    #[test]
    fn article_missing_url_is_rejected() {
        let json = r#"{"title": "No link"}"#;
        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn sort_by_params() {
        assert_eq!(SortBy::Relevancy.as_param(), "relevancy");
        assert_eq!(SortBy::Popularity.as_param(), "popularity");
        assert_eq!(SortBy::PublishedAt.as_param(), "publishedAt");
        assert_eq!(SortBy::default(), SortBy::Relevancy);
        assert_eq!(SortBy::PublishedAt.to_string(), "publishedAt");
    }

    #[test]
    fn sort_by_serde_uses_wire_names() {
        let json = serde_json::to_string(&SortBy::PublishedAt).expect("serialize");
        assert_eq!(json, "\"publishedAt\"");
        let decoded: SortBy = serde_json::from_str("\"popularity\"").expect("deserialize");
        assert_eq!(decoded, SortBy::Popularity);
    }

    #[test]
    fn response_ok_decodes_articles() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"title": "A", "description": "a", "content": "aa", "url": "https://a.com"},
                {"title": "B", "description": "b", "content": "bb", "url": "https://b.com"}
            ]
        }"#;
        match serde_json::from_str::<SearchResponse>(json).expect("decode") {
            SearchResponse::Ok {
                total_results,
                articles,
            } => {
                assert_eq!(total_results, 2);
                assert_eq!(articles.len(), 2);
                assert_eq!(articles[1].url, "https://b.com");
            }
            SearchResponse::Error { .. } => unreachable!("expected ok"),
        }
    }

    #[test]
    fn response_error_decodes_message() {
        let json = r#"{"status": "error", "code": "rateLimited", "message": "Too many requests"}"#;
        match serde_json::from_str::<SearchResponse>(json).expect("decode") {
            SearchResponse::Error { code, message } => {
                assert_eq!(code, "rateLimited");
                assert_eq!(message, "Too many requests");
            }
            SearchResponse::Ok { .. } => unreachable!("expected error"),
        }
    }

    #[test]
    fn response_unknown_status_rejected() {
        let json = r#"{"status": "maybe"}"#;
        assert!(serde_json::from_str::<SearchResponse>(json).is_err());
    }
}
