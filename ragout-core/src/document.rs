//! Data types for documents, chunks, and retrieval results.

use serde::{Deserialize, Serialize};

/// A fixed-dimension vector representation of a piece of text.
pub type Embedding = Vec<f32>;

/// A source document awaiting ingestion.
///
/// Documents are not retained after chunking; only the derived [`Chunk`]s
/// persist in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Source identifier, typically the uploaded filename.
    pub source_id: String,
    /// The full extracted text.
    pub text: String,
}

impl Document {
    /// Create a document from a source identifier and its extracted text.
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { source_id: source_id.into(), text: text.into() }
    }
}

/// A bounded segment of a [`Document`].
///
/// Sequence indices are 0-based and contiguous within a document, so
/// sorting a document's chunks by `seq_index` recovers original text order.
/// Together with the namespace, `(source_id, seq_index)` is the storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The parent document's source identifier.
    pub source_id: String,
    /// Position of this chunk within its document.
    pub seq_index: usize,
    /// The chunk text.
    pub text: String,
}

/// A [`Chunk`] paired with its embedding, ready for storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedChunk {
    /// The chunk itself.
    pub chunk: Chunk,
    /// The embedding of the chunk's text.
    pub embedding: Embedding,
}

/// A retrieved [`Chunk`] paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more similar).
    pub score: f32,
}

/// Chunks ranked by descending similarity, at most `k` of them.
pub type RetrievalResult = Vec<ScoredChunk>;
