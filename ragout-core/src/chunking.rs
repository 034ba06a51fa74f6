//! Document chunking.
//!
//! The splitting unit for this deployment is the **character**: windows
//! never split a UTF-8 code point, and all sizes and overlaps are counted
//! in characters, not bytes.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with contiguous, 0-based sequence
/// indices that preserve original text order. Embeddings are attached later
/// by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// A document with empty text yields an empty `Vec`, not an error.
    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>>;
}

/// Splits text into fixed-size character windows with configurable overlap.
///
/// Windows hold at most `max_size` characters and advance by
/// `max_size - overlap` characters per step, so consecutive chunks share
/// their boundary `overlap` characters. Output is deterministic; text
/// shorter than `max_size` yields exactly one chunk.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    max_size: usize,
    overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidArgument`] unless `max_size > 0` and
    /// `overlap < max_size`.
    pub fn new(max_size: usize, overlap: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(RagError::InvalidArgument("max_size must be greater than zero".to_string()));
        }
        if overlap >= max_size {
            return Err(RagError::InvalidArgument(format!(
                "overlap ({overlap}) must be less than max_size ({max_size})"
            )));
        }
        Ok(Self { max_size, overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>> {
        if document.text.is_empty() {
            return Ok(Vec::new());
        }

        // Byte offset of every character boundary, including the end.
        let mut boundaries: Vec<usize> =
            document.text.char_indices().map(|(offset, _)| offset).collect();
        boundaries.push(document.text.len());
        let char_count = boundaries.len() - 1;

        let step = self.max_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.max_size).min(char_count);
            chunks.push(Chunk {
                source_id: document.source_id.clone(),
                seq_index: chunks.len(),
                text: document.text[boundaries[start]..boundaries[end]].to_string(),
            });
            if end == char_count {
                return Ok(chunks);
            }
            start += step;
        }
    }
}
