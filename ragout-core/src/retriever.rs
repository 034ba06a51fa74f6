//! Query-side retrieval: embed the question, search the store.

use std::sync::Arc;

use tracing::debug;

use crate::document::RetrievalResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::retry::RetryPolicy;
use crate::vectorstore::VectorStore;

/// Fetches the chunks most similar to a question within one namespace.
///
/// Thin composition over an [`EmbeddingProvider`] and a [`VectorStore`];
/// holds no state of its own. The query embedding is ephemeral and
/// discarded after the search.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    retry: RetryPolicy,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever with a fixed top-k.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        retry: RetryPolicy,
        top_k: usize,
    ) -> Self {
        Self { embedder, store, retry, top_k }
    }

    /// Retrieve up to the configured top-k chunks for `question`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidArgument`] for a blank question, or the
    /// embedding/store error otherwise. An empty namespace is not an error;
    /// it retrieves an empty result.
    pub async fn retrieve(&self, namespace: &str, question: &str) -> Result<RetrievalResult> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidArgument("question must not be empty".to_string()));
        }

        let query = self.retry.run("embed_query", || self.embedder.embed(question)).await?;
        let hits = self.store.search(namespace, &query, self.top_k).await?;

        debug!(namespace, hits = hits.len(), "retrieved context");
        Ok(hits)
    }
}
