//! Pipeline orchestration: ingestion, querying, and namespace reset.
//!
//! [`RagPipeline`] composes the [`Chunker`], [`EmbeddingProvider`],
//! [`VectorStore`], [`Retriever`], and
//! [`AnswerSynthesizer`](crate::synthesizer::AnswerSynthesizer). One
//! instance serves every user; the namespace passed to each operation
//! keeps their data apart.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragout_core::{Document, InMemoryVectorStore, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .embedder(Arc::new(embedder))
//!     .generator(Arc::new(chat))
//!     .store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! let stored = pipeline.ingest("alice", &Document::new("notes.txt", text)).await?;
//! let answer = pipeline.query("alice", "what do my notes say about rent?").await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, EmbeddedChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;
use crate::retriever::Retriever;
use crate::synthesizer::{AnswerSynthesizer, EmptyContextPolicy};
use crate::vectorstore::VectorStore;

/// The pipeline orchestrator.
///
/// Ingestion runs chunk → embed (in batches) → upsert; querying runs
/// retrieve → synthesize. Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
    /// One lock per namespace: same-user ingestions serialize while
    /// different users proceed concurrently.
    ingest_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest a document under `namespace`: chunk → embed → store.
    ///
    /// Each batch is upserted as soon as it is embedded, so progress is
    /// never lost to a later failure. Returns the number of chunks stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PartialIngestion`] if embedding fails after the
    /// retry budget with some chunks already stored; the error lists the
    /// stored and missing chunk indices. Upserts are idempotent, so the
    /// caller may simply re-ingest the document.
    pub async fn ingest(&self, namespace: &str, document: &Document) -> Result<usize> {
        let lock = self.ingest_lock(namespace).await;
        let _guard = lock.lock().await;

        let chunks = self.chunker.chunk(document)?;
        if chunks.is_empty() {
            info!(namespace, source_id = %document.source_id, chunk_count = 0, "ingested empty document");
            return Ok(0);
        }

        let mut stored: Vec<usize> = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.config.embed_batch_size) {
            let texts: Vec<&str> = batch.iter().map(|chunk| chunk.text.as_str()).collect();

            let embeddings = match self
                .config
                .retry
                .run("embed_batch", || self.embedder.embed_batch(&texts))
                .await
            {
                Ok(embeddings) if embeddings.len() == batch.len() => embeddings,
                Ok(embeddings) => {
                    let err = RagError::Provider {
                        provider: "embedding".to_string(),
                        message: format!(
                            "expected {} embeddings, got {}",
                            batch.len(),
                            embeddings.len()
                        ),
                    };
                    error!(namespace, source_id = %document.source_id, error = %err, "embedding failed mid-ingestion");
                    return Err(partial_ingestion(&chunks, stored, err));
                }
                Err(err) => {
                    error!(namespace, source_id = %document.source_id, error = %err, "embedding failed mid-ingestion");
                    return Err(partial_ingestion(&chunks, stored, err));
                }
            };

            let embedded: Vec<EmbeddedChunk> = batch
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
                .collect();
            self.store.upsert(namespace, &embedded).await?;
            stored.extend(batch.iter().map(|chunk| chunk.seq_index));
        }

        info!(namespace, source_id = %document.source_id, chunk_count = stored.len(), "ingested document");
        Ok(stored.len())
    }

    /// Answer `question` from the documents stored under `namespace`.
    ///
    /// An empty namespace is not an error: the configured empty-context
    /// policy decides the reply.
    pub async fn query(&self, namespace: &str, question: &str) -> Result<String> {
        let context = self.retriever.retrieve(namespace, question).await?;
        self.synthesizer.answer(question, &context).await
    }

    /// Remove everything stored under `namespace`. Idempotent.
    pub async fn reset(&self, namespace: &str) -> Result<()> {
        self.store.delete_namespace(namespace).await?;
        self.ingest_locks.lock().await.remove(namespace);
        info!(namespace, "namespace reset");
        Ok(())
    }

    async fn ingest_lock(&self, namespace: &str) -> Arc<Mutex<()>> {
        let mut locks = self.ingest_locks.lock().await;
        locks.entry(namespace.to_string()).or_default().clone()
    }
}

/// Build the error for an ingestion that stopped early.
///
/// When nothing was stored yet there is nothing partial to report, so the
/// underlying failure surfaces unchanged (and keeps its transience).
fn partial_ingestion(chunks: &[Chunk], stored: Vec<usize>, cause: RagError) -> RagError {
    if stored.is_empty() {
        return cause;
    }
    let failed = chunks[stored.len()..].iter().map(|chunk| chunk.seq_index).collect();
    RagError::PartialIngestion { stored, failed }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedding provider, generation provider, and vector store are
/// required; the configuration defaults to [`RagConfig::default()`], the
/// chunker to a [`FixedSizeChunker`] built from the configuration, and the
/// empty-context policy to the canned reply.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn GenerationProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    empty_context: Option<EmptyContextPolicy>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the generation provider.
    pub fn generator(mut self, generator: Arc<dyn GenerationProvider>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the vector store backend.
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the empty-context policy.
    pub fn empty_context(mut self, policy: EmptyContextPolicy) -> Self {
        self.empty_context = Some(policy);
        self
    }

    /// Build the [`RagPipeline`], validating that all required parts are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required part is missing, or
    /// [`RagError::InvalidArgument`] if the default chunker cannot be built
    /// from the configuration.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedding provider is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| RagError::Config("generation provider is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RagError::Config("vector store is required".to_string()))?;
        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        let retriever =
            Retriever::new(embedder.clone(), store.clone(), config.retry.clone(), config.top_k);
        let synthesizer = AnswerSynthesizer::new(
            generator,
            config.retry.clone(),
            config.max_context_chars,
            self.empty_context.unwrap_or_default(),
        );

        Ok(RagPipeline {
            config,
            chunker,
            embedder,
            store,
            retriever,
            synthesizer,
            ingest_locks: Mutex::new(HashMap::new()),
        })
    }
}
