//! Vector store trait.

use async_trait::async_trait;

use crate::document::{EmbeddedChunk, RetrievalResult};
use crate::error::Result;

/// A namespaced storage backend for embedded chunks with similarity search.
///
/// The namespace is the isolation boundary (one per end user) and is the
/// mandatory first argument of every operation, so no code path can reach
/// another user's data. Namespaces come into existence on first upsert;
/// there is no separate create step.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Idempotently upsert chunks, keyed by `(namespace, source_id, seq_index)`.
    ///
    /// Re-ingesting a document replaces its prior entries instead of
    /// duplicating them. The first upsert into a namespace establishes the
    /// namespace's dimensionality; chunks embedded with any other
    /// dimensionality fail with
    /// [`RagError::DimensionMismatch`](crate::error::RagError).
    async fn upsert(&self, namespace: &str, chunks: &[EmbeddedChunk]) -> Result<()>;

    /// Return up to `k` entries nearest to `query` by cosine similarity.
    ///
    /// Results are ordered by descending similarity; ties go to the
    /// earlier-ingested entry. A namespace with no entries yields an empty
    /// result, not an error.
    async fn search(&self, namespace: &str, query: &[f32], k: usize) -> Result<RetrievalResult>;

    /// Remove every entry in the namespace. Idempotent.
    async fn delete_namespace(&self, namespace: &str) -> Result<()>;
}
