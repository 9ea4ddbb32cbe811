//! Streaming events emitted by chat providers.
//!
//! A stream flows:
//! ```text
//! StreamStart → TextDelta* → StreamEnd
//! ```
//! and may terminate early with `StreamError`.

/// A normalized streaming event.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmEvent {
    /// Stream has started. First event in every stream.
    StreamStart {
        /// Provider request identifier, when one was returned.
        request_id: String,
        /// The model answering.
        model: String,
    },

    /// A fragment of generated text.
    TextDelta {
        /// The text fragment.
        text: String,
    },

    /// Stream has ended normally.
    StreamEnd {
        /// Why the model stopped generating.
        finish_reason: FinishReason,
    },

    /// Stream encountered an error. No further events follow.
    StreamError {
        /// Description of what went wrong.
        error: String,
    },
}

/// The reason the model stopped generating output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop.
    Stop,
    /// Hit the max token limit.
    Length,
    /// Content was filtered by safety systems.
    ContentFilter,
    /// Provider-specific or unknown reason.
    Other,
}

impl FinishReason {
    /// Map a wire `finish_reason` string.
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "content_filter" => Self::ContentFilter,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Length => write!(f, "length"),
            Self::ContentFilter => write!(f, "content_filter"),
            Self::Other => write!(f, "other"),
        }
    }
}
