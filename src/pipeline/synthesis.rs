//! Stage 3: stream a cited answer from the top-ranked articles.
//!
//! Fragments are appended to an [`AnswerAccumulator`]; after each one the
//! whole running text is handed to an [`AnswerSink`], which replaces
//! whatever it showed before.

use futures_util::StreamExt;

use crate::error::{RagError, Result};
use crate::llm::ChatProvider;
use crate::llm::events::{FinishReason, LlmEvent};
use crate::llm::message::Message;
use crate::llm::types::RequestOptions;
use crate::ranking::ScoredArticle;

/// Receives the full answer text so far after every streamed fragment.
pub trait AnswerSink: Send {
    /// Show `text`, replacing the previous rendering.
    fn render(&mut self, text: &str) -> Result<()>;
}

/// Collects every rendering; the last entry is the final answer.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Renderings in call order.
    pub frames: Vec<String>,
}

impl AnswerSink for RecordingSink {
    fn render(&mut self, text: &str) -> Result<()> {
        self.frames.push(text.to_string());
        Ok(())
    }
}

/// Running total of a streamed answer.
#[derive(Debug, Default)]
pub struct AnswerAccumulator {
    text: String,
    fragments: usize,
    finish_reason: Option<FinishReason>,
}

impl AnswerAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return the text so far.
    pub fn push(&mut self, fragment: &str) -> &str {
        self.text.push_str(fragment);
        self.fragments += 1;
        &self.text
    }

    /// Record why the stream ended.
    pub fn set_finish_reason(&mut self, reason: FinishReason) {
        self.finish_reason = Some(reason);
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of fragments received.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Why the stream ended, if it said.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    /// Consume the accumulator and return the final text.
    pub fn finish(self) -> String {
        self.text
    }
}

/// JSON array of `{title, description, url}` for the first `top_k` articles.
pub fn format_top_results(ranked: &[ScoredArticle], top_k: usize) -> String {
    let results: Vec<serde_json::Value> = ranked
        .iter()
        .take(top_k)
        .map(|scored| {
            serde_json::json!({
                "title": scored.article.title,
                "description": scored.article.description,
                "url": scored.article.url,
            })
        })
        .collect();
    serde_json::Value::Array(results).to_string()
}

/// Prompt combining the top results with the question.
pub fn answer_prompt(question: &str, top_results: &str) -> String {
    format!(
        "Answer the user's question using the search results below.\n\
         TOP_RESULTS: {top_results}\n\
         USER_QUESTION: {question}\n\n\
         Include as much relevant information as you can. Cite the search \
         results you use as inline markdown links to their urls."
    )
}

/// Stream an answer for `question` from the top `top_k` of `ranked`.
///
/// Every text fragment triggers one [`AnswerSink::render`] call with the
/// full text so far. Returns the final text.
///
/// # Errors
///
/// Returns [`RagError::Stream`] if the provider reports a stream error,
/// and any error raised by the request or the sink.
pub async fn synthesize_answer<C: ChatProvider + ?Sized>(
    chat: &C,
    question: &str,
    ranked: &[ScoredArticle],
    top_k: usize,
    options: &RequestOptions,
    sink: &mut dyn AnswerSink,
) -> Result<String> {
    let top_results = format_top_results(ranked, top_k);
    let messages = [Message::user(answer_prompt(question, &top_results))];

    let mut stream = chat.stream(&messages, options).await?;
    let mut answer = AnswerAccumulator::new();

    while let Some(event) = stream.next().await {
        match event {
            LlmEvent::StreamStart { request_id, model } => {
                tracing::debug!(%request_id, %model, "answer stream started");
            }
            LlmEvent::TextDelta { text } => {
                let so_far = answer.push(&text);
                sink.render(so_far)?;
            }
            LlmEvent::StreamEnd { finish_reason } => {
                answer.set_finish_reason(finish_reason);
            }
            LlmEvent::StreamError { error } => {
                tracing::warn!(%error, "answer stream failed");
                return Err(RagError::Stream(error));
            }
        }
    }

    if answer.finish_reason() == Some(FinishReason::Length) {
        tracing::warn!("answer truncated at the token limit");
    }
    tracing::info!(
        fragments = answer.fragments(),
        chars = answer.text().chars().count(),
        "answer complete"
    );
    Ok(answer.finish())
}
