//! OpenAI embeddings client (`POST {base_url}/v1/embeddings`).
//!
//! Large inputs are split into requests of at most `batch_size` texts.
//! Each response is re-ordered by `data[].index` and must contain exactly
//! one vector per input.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingProvider;
use crate::error::RagError;
use crate::llm::openai::{OpenAiConfig, build_client, map_http_error};

/// Largest number of inputs the endpoint accepts in one request.
pub const MAX_BATCH_SIZE: usize = 2048;

/// Embeddings client for OpenAI and compatible endpoints.
pub struct OpenAiEmbedder {
    config: OpenAiConfig,
    client: reqwest::Client,
    batch_size: usize,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl OpenAiEmbedder {
    /// Create an embeddings client.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the key is empty or `batch_size` is
    /// outside `1..=2048`.
    pub fn new(config: OpenAiConfig, batch_size: usize) -> Result<Self, RagError> {
        if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
            return Err(RagError::Config(format!(
                "embedding batch size must be between 1 and {MAX_BATCH_SIZE}"
            )));
        }
        let client = build_client(&config)?;
        Ok(Self {
            config,
            client,
            batch_size,
        })
    }

    async fn request_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: inputs,
        };
        let response = self
            .client
            .post(self.config.endpoint("/v1/embeddings"))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Request(format!("embedding request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RagError::Request(format!("failed to read embedding response: {e}")))?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        parse_embedding_response(&body, inputs.len())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut vectors = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(self.batch_size) {
            vectors.extend(self.request_batch(chunk).await?);
        }
        tracing::debug!(count = vectors.len(), model = %self.config.model, "embedded texts");
        Ok(vectors)
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Decode an embeddings body, restoring input order.
///
/// After sorting, indices must be exactly `0..expected`.
pub fn parse_embedding_response(body: &str, expected: usize) -> Result<Vec<Vec<f32>>, RagError> {
    let mut parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| RagError::Provider(format!("invalid embedding response: {e}")))?;
    parsed.data.sort_by_key(|entry| entry.index);

    if parsed.data.len() != expected {
        return Err(RagError::Embedding(format!(
            "provider returned {} embeddings for {expected} inputs",
            parsed.data.len()
        )));
    }
    if let Some((position, entry)) = parsed
        .data
        .iter()
        .enumerate()
        .find(|(position, entry)| entry.index != *position)
    {
        return Err(RagError::Embedding(format!(
            "embedding index {} at position {position}; expected indices 0..{expected}",
            entry.index
        )));
    }
    Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
}
