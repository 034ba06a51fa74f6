//! OpenAI provider adapters for embeddings and chat completions.
//!
//! This module is only available when the `openai` feature is enabled.
//! Both adapters call the REST API directly with `reqwest`; request and
//! response schemas are private to this module. HTTP 429 and 5xx responses,
//! timeouts, and connection failures map to
//! [`RagError::ProviderUnavailable`] so the surrounding
//! [`RetryPolicy`](crate::retry::RetryPolicy) re-attempts them; everything
//! else is terminal.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::document::Embedding;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default embedding model and its dimensionality.
const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";
const DEFAULT_EMBED_DIMENSIONS: usize = 1536;

/// The default chat model.
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Bound on any single provider request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| RagError::Config(format!("failed to build HTTP client: {e}")))
}

fn api_key_from_env() -> Result<String> {
    std::env::var("OPENAI_API_KEY")
        .map_err(|_| RagError::Config("OPENAI_API_KEY environment variable not set".to_string()))
}

/// Map a non-success HTTP status onto the error taxonomy.
fn classify_status(status: reqwest::StatusCode, detail: String) -> RagError {
    let message = format!("API returned {status}: {detail}");
    if status.as_u16() == 429 || status.is_server_error() {
        RagError::ProviderUnavailable { provider: "openai".to_string(), message }
    } else {
        RagError::Provider { provider: "openai".to_string(), message }
    }
}

/// Map a reqwest transport error onto the error taxonomy.
fn classify_transport(err: reqwest::Error) -> RagError {
    let message = format!("request failed: {err}");
    if err.is_timeout() || err.is_connect() {
        RagError::ProviderUnavailable { provider: "openai".to_string(), message }
    } else {
        RagError::Provider { provider: "openai".to_string(), message }
    }
}

/// POST a JSON body with bearer auth and decode the JSON response.
async fn post_json<B: Serialize, T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<T> {
    let response =
        client.post(url).bearer_auth(api_key).json(body).send().await.map_err(|e| {
            error!(provider = "openai", error = %e, "request failed");
            classify_transport(e)
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail =
            serde_json::from_str::<ApiErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
        error!(provider = "openai", %status, "API error");
        return Err(classify_status(status, detail));
    }

    response.json().await.map_err(|e| {
        error!(provider = "openai", error = %e, "failed to parse response");
        RagError::Provider {
            provider: "openai".to_string(),
            message: format!("failed to parse response: {e}"),
        }
    })
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── Embedding provider ─────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// One HTTPS call embeds a whole batch; the API key comes from the
/// constructor or the `OPENAI_API_KEY` environment variable.
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbeddings {
    /// Create a provider with the given API key and the default model
    /// (`text-embedding-3-small`, 1536 dimensions).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Config("OpenAI API key must not be empty".to_string()));
        }
        Ok(Self {
            client: build_client()?,
            api_key,
            model: DEFAULT_EMBED_MODEL.to_string(),
            dimensions: DEFAULT_EMBED_DIMENSIONS,
        })
    }

    /// Create a provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::new(api_key_from_env()?)
    }

    /// Set the embedding model and its dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(position) = texts.iter().position(|text| text.trim().is_empty()) {
            return Err(RagError::InvalidArgument(format!(
                "input text at index {position} is empty"
            )));
        }

        debug!(provider = "openai", batch_size = texts.len(), model = %self.model, "embedding batch");

        let request = EmbeddingsRequest { model: &self.model, input: texts };
        let response: EmbeddingsResponse =
            post_json(&self.client, OPENAI_EMBEDDINGS_URL, &self.api_key, &request).await?;

        if response.data.len() != texts.len() {
            return Err(RagError::Provider {
                provider: "openai".to_string(),
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    response.data.len()
                ),
            });
        }

        // The API may return entries out of order; the index field is
        // authoritative.
        let mut data = response.data;
        data.sort_by_key(|entry| entry.index);
        Ok(data.into_iter().map(|entry| entry.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Generation provider ────────────────────────────────────────────

/// A [`GenerationProvider`] backed by the OpenAI chat completions API.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    /// Create a provider with the given API key and the default model
    /// (`gpt-4o`).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Config("OpenAI API key must not be empty".to_string()));
        }
        Ok(Self { client: build_client()?, api_key, model: DEFAULT_CHAT_MODEL.to_string() })
    }

    /// Create a provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::new(api_key_from_env()?)
    }

    /// Set the chat model (e.g. `gpt-4o-mini`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl GenerationProvider for OpenAiChat {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        debug!(provider = "openai", model = %self.model, prompt_len = prompt.len(), "chat completion");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
        };
        let response: ChatResponse =
            post_json(&self.client, OPENAI_CHAT_URL, &self.api_key, &request).await?;

        response.choices.into_iter().next().map(|choice| choice.message.content).ok_or_else(|| {
            RagError::Provider {
                provider: "openai".to_string(),
                message: "response contained no choices".to_string(),
            }
        })
    }
}
