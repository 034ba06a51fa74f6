//! Retrieval-augmented generation pipeline core for the Ragout
//! document-chat bot.
//!
//! Ragout ingests a user's document (chunk, embed, store under the user's
//! namespace) and answers their questions by embedding the question,
//! retrieving the nearest chunks, and prompting a chat model with them.
//! The namespace is the isolation boundary: one per end user, mandatory in
//! every store operation, never crossed.
//!
//! Components are composed through the [`RagPipeline`] builder. Provider
//! clients and the store are injected dependencies, so tests substitute
//! fakes freely; the `openai` feature adds ready-made adapters for the
//! OpenAI embeddings and chat completions APIs.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragout_core::{Document, InMemoryVectorStore, RagPipeline};
//! use ragout_core::openai::{OpenAiChat, OpenAiEmbeddings};
//!
//! let pipeline = RagPipeline::builder()
//!     .embedder(Arc::new(OpenAiEmbeddings::from_env()?))
//!     .generator(Arc::new(OpenAiChat::from_env()?))
//!     .store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! let stored = pipeline.ingest("alice", &Document::new("notes.txt", text)).await?;
//! let answer = pipeline.query("alice", "what do my notes say about rent?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod retriever;
pub mod retry;
pub mod synthesizer;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, EmbeddedChunk, Embedding, RetrievalResult, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::GenerationProvider;
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
pub use retry::RetryPolicy;
pub use synthesizer::{AnswerSynthesizer, DEFAULT_NO_CONTEXT_REPLY, EmptyContextPolicy};
pub use vectorstore::VectorStore;
