//! Question-answering pipeline.
//!
//! Strictly sequential:
//!
//! 1. [`expansion`]: question to search queries (JSON mode)
//! 2. search every query, merge, dedup by URL
//! 3. [`hypothetical`]: placeholder answer (JSON mode), embedded as the anchor
//! 4. embed every article, score by dot product, sort descending
//! 5. [`synthesis`]: stream an answer from the top-ranked articles
//!
//! Any stage failure aborts the run. Each run is independent; nothing is
//! cached between questions.

pub mod expansion;
pub mod hypothetical;
pub mod synthesis;

use hyde_search::{Article, NewsApiSource, NewsSource, SearchConfig, gather_articles};
use serde::de::DeserializeOwned;

use crate::config::{ApiKeys, PipelineSection, RagConfig};
use crate::embedding::EmbeddingProvider;
use crate::embedding::openai::OpenAiEmbedder;
use crate::error::{RagError, Result};
use crate::llm::ChatProvider;
use crate::llm::openai::OpenAiChat;
use crate::llm::types::RequestOptions;
use crate::ranking::{ScoredArticle, article_text, rank_articles};

use synthesis::AnswerSink;

/// System message for every JSON-mode call.
pub const JSON_SYSTEM_PROMPT: &str = "Output only valid JSON.";

/// Strictly decode a model reply into `T`.
///
/// No repair is attempted: surrounding prose, code fences, missing or
/// extra fields all fail.
pub(crate) fn parse_json_reply<T: DeserializeOwned>(reply: &str, what: &str) -> Result<T> {
    serde_json::from_str(reply).map_err(|e| {
        tracing::warn!(error = %e, "model returned malformed {what}");
        RagError::MalformedOutput(format!("malformed {what}: {e}"))
    })
}

/// Queries and ranked articles for one question.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Search queries, ending with the original question.
    pub queries: Vec<String>,
    /// Unique articles, highest score first.
    pub ranked: Vec<ScoredArticle>,
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Search queries, ending with the original question.
    pub queries: Vec<String>,
    /// Unique articles, highest score first.
    pub ranked: Vec<ScoredArticle>,
    /// Final answer text.
    pub answer: String,
}

/// The assembled pipeline.
pub struct Pipeline<C, E, S> {
    chat: C,
    embedder: E,
    source: S,
    search: SearchConfig,
    settings: PipelineSection,
}

impl Pipeline<OpenAiChat, OpenAiEmbedder, NewsApiSource> {
    /// Build the production pipeline from config and resolved keys.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the config is invalid or a client
    /// cannot be built.
    pub fn from_config(config: &RagConfig, keys: &ApiKeys) -> Result<Self> {
        config.validate()?;
        let chat = OpenAiChat::new(config.chat_config(&keys.openai))?;
        let embedder = OpenAiEmbedder::new(
            config.embedding_config(&keys.openai),
            config.openai.embedding_batch_size,
        )?;
        let source = NewsApiSource::new(&keys.news, &config.news.search)
            .map_err(|e| RagError::Config(e.to_string()))?;
        Ok(Self::new(
            chat,
            embedder,
            source,
            config.news.search.clone(),
            config.pipeline.clone(),
        ))
    }
}

impl<C, E, S> Pipeline<C, E, S>
where
    C: ChatProvider,
    E: EmbeddingProvider,
    S: NewsSource,
{
    /// Assemble a pipeline from its parts.
    pub fn new(
        chat: C,
        embedder: E,
        source: S,
        search: SearchConfig,
        settings: PipelineSection,
    ) -> Self {
        Self {
            chat,
            embedder,
            source,
            search,
            settings,
        }
    }

    /// Pipeline parameters in effect.
    pub fn settings(&self) -> &PipelineSection {
        &self.settings
    }

    /// Mutable access to the pipeline parameters (e.g. CLI overrides).
    pub fn settings_mut(&mut self) -> &mut PipelineSection {
        &mut self.settings
    }

    /// Search settings in effect.
    pub fn search_config_mut(&mut self) -> &mut SearchConfig {
        &mut self.search
    }

    fn json_options(&self) -> RequestOptions {
        RequestOptions::new()
            .with_temperature(self.settings.json_temperature)
            .with_json_mode(true)
    }

    fn answer_options(&self) -> RequestOptions {
        let options = RequestOptions::new().with_temperature(self.settings.answer_temperature);
        match self.settings.max_answer_tokens {
            Some(max) => options.with_max_tokens(max),
            None => options,
        }
    }

    /// Run every stage and stream the answer into `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first error from any stage.
    pub async fn run(&self, question: &str, sink: &mut dyn AnswerSink) -> Result<PipelineOutcome> {
        let Retrieval { queries, ranked } = self.retrieve(question).await?;
        let answer = self.answer(question, &ranked, sink).await?;
        Ok(PipelineOutcome {
            queries,
            ranked,
            answer,
        })
    }

    /// Expansion, search and re-ranking, without synthesis.
    ///
    /// # Errors
    ///
    /// Returns the first error from expansion, search, the hypothetical
    /// answer or embedding.
    pub async fn retrieve(&self, question: &str) -> Result<Retrieval> {
        if question.trim().is_empty() {
            return Err(RagError::Config("question must not be empty".into()));
        }

        let json_options = self.json_options();
        let queries = expansion::expand_queries(&self.chat, question, &json_options).await?;

        let articles = gather_articles(&self.source, &queries, &self.search).await?;
        let ranked = self.rerank(question, articles, &json_options).await?;

        Ok(Retrieval { queries, ranked })
    }

    /// Stream an answer from already-ranked articles.
    ///
    /// # Errors
    ///
    /// Returns request, stream or sink errors.
    pub async fn answer(
        &self,
        question: &str,
        ranked: &[ScoredArticle],
        sink: &mut dyn AnswerSink,
    ) -> Result<String> {
        synthesis::synthesize_answer(
            &self.chat,
            question,
            ranked,
            self.settings.top_k,
            &self.answer_options(),
            sink,
        )
        .await
    }

    async fn rerank(
        &self,
        question: &str,
        articles: Vec<Article>,
        json_options: &RequestOptions,
    ) -> Result<Vec<ScoredArticle>> {
        if articles.is_empty() {
            tracing::warn!("search returned no articles; skipping re-ranking");
            return Ok(Vec::new());
        }

        let hypothetical =
            hypothetical::hypothetical_answer(&self.chat, question, json_options).await?;
        let anchor = self.embedder.embed(&hypothetical).await?;

        let texts: Vec<String> = articles.iter().map(article_text).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let ranked = rank_articles(articles, &embeddings, &anchor)?;
        tracing::info!(
            count = ranked.len(),
            top_score = ranked.first().map(|s| s.score),
            "ranked articles"
        );
        Ok(ranked)
    }
}
