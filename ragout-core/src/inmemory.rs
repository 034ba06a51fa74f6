//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps every namespace in a `HashMap` behind a
//! `tokio::sync::RwLock` held only for the duration of a single operation,
//! so operations on different namespaces never block each other for long.
//! Suitable for development, testing, and deployments that accept losing
//! stored chunks on restart; durable backends implement the same
//! [`VectorStore`] trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{EmbeddedChunk, RetrievalResult, ScoredChunk};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A stored chunk with its ingestion ordinal for stable tie-breaking.
struct Entry {
    chunk: EmbeddedChunk,
    ordinal: u64,
}

/// Per-namespace state: the dimensionality established by the first upsert
/// plus entries in ingestion order.
struct NamespaceData {
    dimensions: usize,
    entries: Vec<Entry>,
    next_ordinal: u64,
}

/// An in-memory [`VectorStore`] using cosine similarity for search.
#[derive(Default)]
pub struct InMemoryVectorStore {
    namespaces: RwLock<HashMap<String, NamespaceData>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, namespace: &str, chunks: &[EmbeddedChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let mut namespaces = self.namespaces.write().await;

        // Validate the whole batch before touching anything, so a failed
        // upsert never leaves the namespace half-written.
        let expected = namespaces
            .get(namespace)
            .map(|ns| ns.dimensions)
            .unwrap_or(chunks[0].embedding.len());
        for chunk in chunks {
            if chunk.embedding.len() != expected {
                return Err(RagError::DimensionMismatch {
                    namespace: namespace.to_string(),
                    expected,
                    actual: chunk.embedding.len(),
                });
            }
        }

        let ns = namespaces.entry(namespace.to_string()).or_insert_with(|| NamespaceData {
            dimensions: expected,
            entries: Vec::new(),
            next_ordinal: 0,
        });

        for chunk in chunks {
            let existing = ns.entries.iter_mut().find(|entry| {
                entry.chunk.chunk.source_id == chunk.chunk.source_id
                    && entry.chunk.chunk.seq_index == chunk.chunk.seq_index
            });
            match existing {
                // Replacement keeps the entry's original ingestion position.
                Some(entry) => entry.chunk = chunk.clone(),
                None => {
                    let ordinal = ns.next_ordinal;
                    ns.next_ordinal += 1;
                    ns.entries.push(Entry { chunk: chunk.clone(), ordinal });
                }
            }
        }

        debug!(namespace, count = chunks.len(), "upserted chunks");
        Ok(())
    }

    async fn search(&self, namespace: &str, query: &[f32], k: usize) -> Result<RetrievalResult> {
        let namespaces = self.namespaces.read().await;
        let Some(ns) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        if query.len() != ns.dimensions {
            return Err(RagError::DimensionMismatch {
                namespace: namespace.to_string(),
                expected: ns.dimensions,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(ScoredChunk, u64)> = ns
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(&entry.chunk.embedding, query);
                (ScoredChunk { chunk: entry.chunk.chunk.clone(), score }, entry.ordinal)
            })
            .collect();

        // Descending similarity; equal scores go to the earlier ingestion.
        scored.sort_by(|(a, ord_a), (b, ord_b)| {
            b.score.total_cmp(&a.score).then(ord_a.cmp(ord_b))
        });
        scored.truncate(k);

        debug!(namespace, hits = scored.len(), "searched namespace");
        Ok(scored.into_iter().map(|(hit, _)| hit).collect())
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        namespaces.remove(namespace);
        debug!(namespace, "deleted namespace");
        Ok(())
    }
}
