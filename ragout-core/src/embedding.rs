//! Embedding provider trait.

use async_trait::async_trait;

use crate::document::Embedding;
use crate::error::{RagError, Result};

/// A provider that converts text into fixed-dimension vectors.
///
/// Batching is the primary operation: the ingestion pipeline hands every
/// text of a batch to one [`embed_batch`](EmbeddingProvider::embed_batch)
/// call, and implementations must return one embedding per input, in input
/// order. Empty input texts are rejected with
/// [`RagError::InvalidArgument`] before any network traffic.
///
/// Transient backend failures (rate limiting, timeouts) map to
/// [`RagError::ProviderUnavailable`] so the surrounding
/// [`RetryPolicy`](crate::retry::RetryPolicy) can re-attempt them.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per text, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let mut embeddings = self.embed_batch(&[text]).await?;
        embeddings.pop().ok_or_else(|| RagError::Provider {
            provider: "embedding".to_string(),
            message: "provider returned no embedding for a single-text batch".to_string(),
        })
    }

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}
