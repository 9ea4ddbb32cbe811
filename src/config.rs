//! Configuration for hyde-rag.
//!
//! Loaded from TOML with three sections:
//!
//! ```toml
//! [openai]
//! chat_model = "gpt-3.5-turbo"
//! api_key = { type = "env", var = "OPENAI_API_KEY" }
//!
//! [news]
//! api_key = { type = "env", var = "NEWS_API_KEY" }
//!
//! [news.search]
//! page_size = 50
//! from = "2023-06-01"
//! to = "2023-06-30"
//!
//! [pipeline]
//! top_k = 5
//! ```
//!
//! Secrets are resolved once, at startup, and handed to each component's
//! constructor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hyde_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::embedding::openai::MAX_BATCH_SIZE;
use crate::error::{RagError, Result};
use crate::llm::openai::{DEFAULT_BASE_URL, OpenAiConfig};

/// Number of ranked articles handed to answer synthesis.
pub const ANSWER_TOP_K: usize = 5;

/// Reference to a secret value.
///
/// - `none`: no secret configured
/// - `env`: read from an environment variable
/// - `literal`: stored inline (development only)
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecretRef {
    /// No secret configured.
    #[default]
    None,
    /// Load from environment variable.
    Env {
        /// Variable name.
        var: String,
    },
    /// Literal value.
    Literal {
        /// The secret itself.
        value: String,
    },
}

impl std::fmt::Debug for SecretRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Env { var } => f.debug_struct("Env").field("var", var).finish(),
            Self::Literal { .. } => f.debug_struct("Literal").field("value", &"***").finish(),
        }
    }
}

impl SecretRef {
    /// Environment-variable reference.
    pub fn env(var: impl Into<String>) -> Self {
        Self::Env { var: var.into() }
    }

    /// Resolve the secret to its actual value.
    ///
    /// Returns `Ok(None)` for [`SecretRef::None`].
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Env { var } => std::env::var(var)
                .map(Some)
                .map_err(|_| RagError::Config(format!("environment variable '{var}' not set"))),
            Self::Literal { value } => Ok(Some(value.clone())),
        }
    }

    /// Resolve a secret that must be present and non-empty.
    fn require(&self, what: &str) -> Result<String> {
        match self.resolve()? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(RagError::Config(format!("no {what} API key configured"))),
        }
    }
}

/// `[openai]` section: chat and embedding endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSection {
    /// API key reference.
    pub api_key: SecretRef,
    /// API root.
    pub base_url: String,
    /// Model used for expansion, hypothetical answer and synthesis.
    pub chat_model: String,
    /// Model used for embeddings.
    pub embedding_model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum texts per embeddings request.
    pub embedding_batch_size: usize,
}

impl Default for OpenAiSection {
    fn default() -> Self {
        Self {
            api_key: SecretRef::env("OPENAI_API_KEY"),
            base_url: DEFAULT_BASE_URL.into(),
            chat_model: "gpt-3.5-turbo".into(),
            embedding_model: "text-embedding-ada-002".into(),
            timeout_secs: 60,
            embedding_batch_size: MAX_BATCH_SIZE,
        }
    }
}

/// `[news]` section: search endpoint key and query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSection {
    /// API key reference.
    pub api_key: SecretRef,
    /// Query settings passed to the search client.
    pub search: SearchConfig,
}

impl Default for NewsSection {
    fn default() -> Self {
        Self {
            api_key: SecretRef::env("NEWS_API_KEY"),
            search: SearchConfig::default(),
        }
    }
}

/// `[pipeline]` section: generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Temperature for the JSON-mode calls (expansion, hypothetical answer).
    pub json_temperature: f64,
    /// Temperature for answer synthesis.
    pub answer_temperature: f64,
    /// Ranked articles included in the answer prompt. Defaults to
    /// [`ANSWER_TOP_K`] (5); other values are an override.
    pub top_k: usize,
    /// Optional cap on answer length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_answer_tokens: Option<usize>,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            json_temperature: 0.5,
            answer_temperature: 0.5,
            top_k: ANSWER_TOP_K,
            max_answer_tokens: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Chat and embedding provider.
    pub openai: OpenAiSection,
    /// News search.
    pub news: NewsSection,
    /// Pipeline parameters.
    pub pipeline: PipelineSection,
}

/// API keys resolved at startup.
#[derive(Clone)]
pub struct ApiKeys {
    /// OpenAI bearer token.
    pub openai: String,
    /// News search key.
    pub news: String,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKeys { .. }")
    }
}

impl RagConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RagError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| RagError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RagError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/hyde-rag/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("hyde-rag").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("hyde-rag")
                .join("config.toml")
        } else {
            PathBuf::from("hyde-rag.toml")
        }
    }

    /// Check every section for values the providers would reject.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.openai.base_url).map_err(|e| {
            RagError::Config(format!("invalid openai.base_url '{}': {e}", self.openai.base_url))
        })?;
        if self.openai.chat_model.trim().is_empty() {
            return Err(RagError::Config("openai.chat_model must not be empty".into()));
        }
        if self.openai.embedding_model.trim().is_empty() {
            return Err(RagError::Config(
                "openai.embedding_model must not be empty".into(),
            ));
        }
        if self.openai.timeout_secs == 0 {
            return Err(RagError::Config(
                "openai.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.openai.embedding_batch_size == 0
            || self.openai.embedding_batch_size > MAX_BATCH_SIZE
        {
            return Err(RagError::Config(format!(
                "openai.embedding_batch_size must be between 1 and {MAX_BATCH_SIZE}"
            )));
        }
        for (name, temp) in [
            ("json_temperature", self.pipeline.json_temperature),
            ("answer_temperature", self.pipeline.answer_temperature),
        ] {
            if !(0.0..=2.0).contains(&temp) {
                return Err(RagError::Config(format!(
                    "pipeline.{name} must be between 0.0 and 2.0"
                )));
            }
        }
        if self.pipeline.top_k == 0 {
            return Err(RagError::Config("pipeline.top_k must be at least 1".into()));
        }
        self.news
            .search
            .validate()
            .map_err(|e| RagError::Config(format!("news.search: {e}")))
    }

    /// Resolve both API keys.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if either key is missing or empty.
    pub fn resolve_keys(&self) -> Result<ApiKeys> {
        Ok(ApiKeys {
            openai: self.openai.api_key.require("OpenAI")?,
            news: self.news.api_key.require("news")?,
        })
    }

    /// Connection settings for the chat model.
    pub fn chat_config(&self, api_key: &str) -> OpenAiConfig {
        self.openai_config(api_key, &self.openai.chat_model)
    }

    /// Connection settings for the embedding model.
    pub fn embedding_config(&self, api_key: &str) -> OpenAiConfig {
        self.openai_config(api_key, &self.openai.embedding_model)
    }

    fn openai_config(&self, api_key: &str, model: &str) -> OpenAiConfig {
        OpenAiConfig::new(api_key, model)
            .with_base_url(&self.openai.base_url)
            .with_timeout(Duration::from_secs(self.openai.timeout_secs))
    }
}
