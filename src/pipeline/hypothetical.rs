//! Stage 2a: a fabricated, placeholder-filled answer used as the ranking
//! anchor. It is never shown to the user.

use serde::Deserialize;

use crate::error::Result;
use crate::llm::ChatProvider;
use crate::llm::message::Message;
use crate::llm::types::RequestOptions;
use crate::pipeline::{JSON_SYSTEM_PROMPT, parse_json_reply};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HypotheticalReply {
    #[serde(rename = "hypotheticalAnswer")]
    hypothetical_answer: String,
}

/// Prompt asking for an answer-shaped reply with placeholders for facts.
pub fn hypothetical_prompt(question: &str) -> String {
    format!(
        "Write a hypothetical answer to the user's question. It will only be \
         used to rank news articles by similarity.\n\
         Answer as if you had all the information you need, but do not state \
         any real facts. Use placeholders instead, such as NAME did something, \
         NAME said something at PLACE, or NUMBER people attended on DATE.\n\n\
         User question: {question}\n\n\
         Format: {{\"hypotheticalAnswer\": \"hypothetical answer text\"}}"
    )
}

/// Ask the model for a hypothetical answer to `question`.
///
/// # Errors
///
/// Returns [`RagError::MalformedOutput`](crate::error::RagError::MalformedOutput)
/// if the reply is not exactly `{"hypotheticalAnswer": string}`.
pub async fn hypothetical_answer<C: ChatProvider + ?Sized>(
    chat: &C,
    question: &str,
    options: &RequestOptions,
) -> Result<String> {
    let messages = [
        Message::system(JSON_SYSTEM_PROMPT),
        Message::user(hypothetical_prompt(question)),
    ];
    let reply = chat.complete(&messages, options).await?;
    let parsed: HypotheticalReply = parse_json_reply(&reply, "hypothetical answer")?;

    tracing::debug!(answer = %parsed.hypothetical_answer, "hypothetical answer");
    Ok(parsed.hypothetical_answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::ScriptedChat;

    #[tokio::test]
    async fn extracts_answer_text() {
        let chat = ScriptedChat::replying(
            r#"{"hypotheticalAnswer": "NAME announced NUMBER new jobs in PLACE on DATE."}"#,
        );
        let answer = hypothetical_answer(&chat, "Any job news?", &RequestOptions::new())
            .await
            .expect("answer");
        assert_eq!(answer, "NAME announced NUMBER new jobs in PLACE on DATE.");
    }

    #[tokio::test]
    async fn snake_case_key_is_malformed() {
        let chat = ScriptedChat::replying(r#"{"hypothetical_answer": "x"}"#);
        let err = hypothetical_answer(&chat, "q", &RequestOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MALFORMED_OUTPUT");
    }

    #[tokio::test]
    async fn non_string_answer_is_malformed() {
        let chat = ScriptedChat::replying(r#"{"hypotheticalAnswer": ["a", "b"]}"#);
        assert!(hypothetical_answer(&chat, "q", &RequestOptions::new())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn provider_error_passes_through() {
        let chat = ScriptedChat::failing(crate::error::RagError::Auth("bad key".into()));
        let err = hypothetical_answer(&chat, "q", &RequestOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "AUTH_FAILED");
    }

    #[test]
    fn prompt_mentions_placeholders_and_format() {
        let prompt = hypothetical_prompt("Who won?");
        assert!(prompt.contains("placeholders"));
        assert!(prompt.contains("hypotheticalAnswer"));
        assert!(prompt.contains("User question: Who won?"));
        assert!(!prompt.contains("search queries"));
    }
}
