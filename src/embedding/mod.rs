//! Text embedding abstraction.
//!
//! Vectors are assumed to be unit-normalized by the provider, so callers
//! may score them with a plain dot product.

pub mod openai;

use async_trait::async_trait;

use crate::error::RagError;

/// Trait for text embedding backends.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed every input, returning vectors in input order.
    ///
    /// The result has exactly `inputs.len()` entries.
    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// Embed a single text.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, RagError> {
        let mut vectors = self.embed_batch(&[input.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| RagError::Embedding("provider returned no embedding".into()))
    }
}
