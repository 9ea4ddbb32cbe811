//! Stage 1: turn the user question into a list of search queries.

use serde::Deserialize;

use crate::error::Result;
use crate::llm::ChatProvider;
use crate::llm::message::Message;
use crate::llm::types::RequestOptions;
use crate::pipeline::{JSON_SYSTEM_PROMPT, parse_json_reply};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryList {
    queries: Vec<String>,
}

/// Prompt asking for a broad, varied set of search queries.
pub fn expansion_prompt(question: &str) -> String {
    format!(
        "You can query a news search API that returns recent articles.\n\
         Write an array of search queries relevant to the question below.\n\
         Vary the keywords and keep the queries general. Include combinations \
         with and without individual terms, for example \
         [\"keyword_1 keyword_2\", \"keyword_1\", \"keyword_2\"].\n\
         More queries make it more likely that relevant articles are found.\n\n\
         User question: {question}\n\n\
         Format: {{\"queries\": [\"query_1\", \"query_2\", \"query_3\"]}}"
    )
}

/// Ask the model for search queries and append the original question.
///
/// The returned list always ends with `question` itself, even if the model
/// already included it.
///
/// # Errors
///
/// Returns [`RagError::MalformedOutput`](crate::error::RagError::MalformedOutput)
/// if the reply is not exactly `{"queries": [string, ...]}`, and provider
/// errors unchanged.
pub async fn expand_queries<C: ChatProvider + ?Sized>(
    chat: &C,
    question: &str,
    options: &RequestOptions,
) -> Result<Vec<String>> {
    let messages = [
        Message::system(JSON_SYSTEM_PROMPT),
        Message::user(expansion_prompt(question)),
    ];
    let reply = chat.complete(&messages, options).await?;
    let QueryList { mut queries } = parse_json_reply(&reply, "query list")?;

    queries.push(question.to_string());
    tracing::info!(count = queries.len(), "expanded question into queries");
    tracing::debug!(?queries, "search queries");
    Ok(queries)
}
