//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the endpoint, page size, sort order, date
//! window and whether queries run one at a time or concurrently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SortBy;

/// Largest page the endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// How a batch of queries is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// One request at a time, in query order.
    #[default]
    Sequential,
    /// All requests in flight at once; results are still merged in query order.
    Concurrent,
}

/// Configuration for a news search run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Endpoint root, without the `/v2/...` path.
    pub base_url: String,
    /// Articles requested per query.
    pub page_size: u32,
    /// Sort order requested from the endpoint.
    pub sort_by: SortBy,
    /// Earliest publication date (inclusive).
    pub from: NaiveDate,
    /// Latest publication date (inclusive).
    pub to: NaiveDate,
    /// Optional two-letter language filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Sequential or concurrent query execution.
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org".into(),
            page_size: 50,
            sort_by: SortBy::Relevancy,
            from: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap_or_default(),
            to: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap_or_default(),
            language: None,
            timeout_seconds: 30,
            mode: SearchMode::Sequential,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `page_size` must be within `1..=100`
    /// - `timeout_seconds` must be greater than 0
    /// - `from` must not be after `to`
    /// - `base_url` must parse as an absolute URL that can take a path
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(SearchError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.from > self.to {
            return Err(SearchError::Config(format!(
                "date range start {} is after end {}",
                self.from, self.to
            )));
        }
        self.everything_url()?;
        Ok(())
    }

    /// Full URL of the article search endpoint.
    ///
    /// `v2/everything` is appended to any path already in `base_url`.
    pub fn everything_url(&self) -> Result<url::Url, SearchError> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| {
                SearchError::Config(format!("base_url '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v2", "everything"]);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.base_url, "https://newsapi.org");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.sort_by, SortBy::Relevancy);
        assert_eq!(config.from.to_string(), "2023-06-01");
        assert_eq!(config.to.to_string(), "2023-06-30");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.mode, SearchMode::Sequential);
        assert!(config.language.is_none());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_page_size_rejected() {
        let config = SearchConfig {
            page_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn oversized_page_rejected() {
        let config = SearchConfig {
            page_size: MAX_PAGE_SIZE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_page_size_accepted() {
        let config = SearchConfig {
            page_size: MAX_PAGE_SIZE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn inverted_date_range_rejected() {
        let config = SearchConfig {
            from: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap_or_default(),
            to: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap_or_default(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("date range"));
    }

    #[test]
    fn single_day_range_valid() {
        let day = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap_or_default();
        let config = SearchConfig {
            from: day,
            to: day,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_base_url_rejected() {
        let config = SearchConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn everything_url_joins_path() {
        let config = SearchConfig {
            base_url: "http://127.0.0.1:9000/".into(),
            ..Default::default()
        };
        let url = config.everything_url().expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v2/everything");
    }

    #[test]
    fn everything_url_keeps_base_path() {
        for base in ["https://proxy.example/newsapi", "https://proxy.example/newsapi/"] {
            let config = SearchConfig {
                base_url: base.into(),
                ..Default::default()
            };
            let url = config.everything_url().expect("url");
            assert_eq!(url.as_str(), "https://proxy.example/newsapi/v2/everything");
        }
    }

    #[test]
    fn everything_url_rejects_non_hierarchical_base() {
        let config = SearchConfig {
            base_url: "mailto:news@example.com".into(),
            ..Default::default()
        };
        assert!(matches!(config.everything_url(), Err(SearchError::Config(_))));
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let json = r#"{"page_size": 10, "mode": "concurrent", "from": "2024-01-01", "to": "2024-01-31"}"#;
        let config: SearchConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.mode, SearchMode::Concurrent);
        assert_eq!(config.from.to_string(), "2024-01-01");
        assert_eq!(config.base_url, "https://newsapi.org");
    }
}
