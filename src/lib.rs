//! hyde-rag: question answering over recent news with HyDE re-ranking.
//!
//! A question flows through a fixed sequence of stages:
//! Question → query expansion → news search → hypothetical answer →
//! embedding re-rank → streamed answer
//!
//! # Architecture
//!
//! - **LLM**: [`llm::ChatProvider`] with an OpenAI chat-completions client
//!   supporting JSON mode and SSE streaming
//! - **Embeddings**: [`embedding::EmbeddingProvider`] with a batched OpenAI
//!   embeddings client
//! - **Search**: the `hyde-search` workspace crate (NewsAPI client, merge
//!   and dedup)
//! - **Ranking**: dot-product similarity against the hypothetical-answer
//!   embedding
//! - **Pipeline**: [`pipeline::Pipeline`] runs the stages and streams the
//!   answer into an [`pipeline::synthesis::AnswerSink`]

pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod ranking;

pub use config::{ApiKeys, RagConfig};
pub use error::{RagError, Result};
pub use hyde_search::{Article, SearchConfig, SearchMode};
pub use pipeline::synthesis::{AnswerSink, RecordingSink};
pub use pipeline::{Pipeline, PipelineOutcome, Retrieval};
pub use ranking::ScoredArticle;
