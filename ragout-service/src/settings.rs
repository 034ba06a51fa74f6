//! Service configuration from the environment.

use std::sync::Arc;

use ragout_core::error::{RagError, Result};
use ragout_core::openai::{OpenAiChat, OpenAiEmbeddings};
use ragout_core::{InMemoryVectorStore, RagConfig, RagPipeline};

use crate::extract::PlainTextExtractor;
use crate::service::BotService;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// OpenAI API credential.
    pub openai_api_key: String,
    /// Embedding model name.
    pub embed_model: String,
    /// Dimensionality of the embedding model's vectors.
    pub embed_dimensions: usize,
    /// Chat model name.
    pub chat_model: String,
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Maximum texts per embedding request.
    pub embed_batch_size: usize,
    /// Character budget for retrieved context within the prompt.
    pub max_context_chars: usize,
}

impl Settings {
    /// Load settings from the process environment, reading a `.env` file
    /// first when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `OPENAI_API_KEY` is missing or a
    /// `RAGOUT_*` override does not parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            RagError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self {
            openai_api_key,
            embed_model: env_or("RAGOUT_EMBED_MODEL", "text-embedding-3-small"),
            embed_dimensions: env_parse("RAGOUT_EMBED_DIMENSIONS", 1536)?,
            chat_model: env_or("RAGOUT_CHAT_MODEL", "gpt-4o"),
            chunk_size: env_parse("RAGOUT_CHUNK_SIZE", 1000)?,
            chunk_overlap: env_parse("RAGOUT_CHUNK_OVERLAP", 200)?,
            top_k: env_parse("RAGOUT_TOP_K", 4)?,
            embed_batch_size: env_parse("RAGOUT_EMBED_BATCH_SIZE", 64)?,
            max_context_chars: env_parse("RAGOUT_MAX_CONTEXT_CHARS", 6000)?,
        })
    }

    /// Assemble the full service: OpenAI providers, the in-memory store,
    /// the pipeline, and the plain-text extractor.
    ///
    /// Providers and the store are constructed exactly once here and
    /// injected; nothing else in the process holds provider state.
    pub fn build_service(&self) -> Result<BotService> {
        let config = RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .embed_batch_size(self.embed_batch_size)
            .max_context_chars(self.max_context_chars)
            .build()?;

        let embedder = OpenAiEmbeddings::new(self.openai_api_key.clone())?
            .with_model(self.embed_model.clone(), self.embed_dimensions);
        let chat = OpenAiChat::new(self.openai_api_key.clone())?
            .with_model(self.chat_model.clone());

        let pipeline = RagPipeline::builder()
            .config(config)
            .embedder(Arc::new(embedder))
            .generator(Arc::new(chat))
            .store(Arc::new(InMemoryVectorStore::new()))
            .build()?;

        Ok(BotService::new(Arc::new(pipeline), Arc::new(PlainTextExtractor)))
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse(name: &str, default: usize) -> Result<usize> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| RagError::Config(format!("{name} must be a positive integer, got '{value}'"))),
        Err(_) => Ok(default),
    }
}
