//! The transport-facing service boundary.
//!
//! [`BotService`] consumes [`BotEvent`]s and always produces a reply
//! string. Pipeline errors never escape this boundary: each is logged with
//! its namespace and operation (never credentials) and translated into
//! fixed user-facing text.

use std::sync::Arc;

use tracing::{error, info, warn};

use ragout_core::{Document, RagError, RagPipeline};

use crate::event::BotEvent;
use crate::extract::TextExtractor;

/// Greeting for the transport's `/start` command.
pub const WELCOME_REPLY: &str = "Hi there! I'm Ragout. Send me a document and I'll answer \
     questions about it. Type /help for more.";

/// Reply for the transport's `/help` command.
pub const HELP_REPLY: &str = "Here's what you can do:\n\
     - Send me a .txt or .md file, and I will process it for your questions.\n\
     - Ask me questions about the document you uploaded.\n\
     - Use /reset to erase your data and start over.";

/// Handles transport events end to end.
pub struct BotService {
    pipeline: Arc<RagPipeline>,
    extractor: Arc<dyn TextExtractor>,
}

impl BotService {
    /// Create a service over an assembled pipeline and extractor.
    pub fn new(pipeline: Arc<RagPipeline>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { pipeline, extractor }
    }

    /// Handle one transport event, always producing a reply.
    pub async fn handle(&self, event: BotEvent) -> String {
        match event {
            BotEvent::DocumentUploaded { namespace, data, filename } => {
                self.handle_document(&namespace, &data, &filename).await
            }
            BotEvent::QuestionAsked { namespace, text } => {
                self.handle_question(&namespace, &text).await
            }
            BotEvent::ResetRequested { namespace } => self.handle_reset(&namespace).await,
        }
    }

    async fn handle_document(&self, namespace: &str, data: &[u8], filename: &str) -> String {
        let text = match self.extractor.extract(data, filename) {
            Ok(text) => text,
            Err(err) => {
                warn!(namespace, filename, error = %err, "document rejected");
                return user_reply("upload", namespace, &err);
            }
        };

        match self.pipeline.ingest(namespace, &Document::new(filename, text)).await {
            Ok(0) => "That document appears to be empty; nothing was stored.".to_string(),
            Ok(count) => {
                info!(namespace, filename, chunk_count = count, "document processed");
                format!(
                    "Document '{filename}' processed! {count} passages stored. \
                     Ask me anything about it."
                )
            }
            Err(err) => user_reply("ingest", namespace, &err),
        }
    }

    async fn handle_question(&self, namespace: &str, text: &str) -> String {
        match self.pipeline.query(namespace, text).await {
            Ok(answer) => answer,
            Err(err) => user_reply("query", namespace, &err),
        }
    }

    async fn handle_reset(&self, namespace: &str) -> String {
        match self.pipeline.reset(namespace).await {
            Ok(()) => {
                "Your data has been erased. Start again by uploading a new document.".to_string()
            }
            Err(err) => user_reply("reset", namespace, &err),
        }
    }
}

/// Translate a pipeline error into user-facing text.
fn user_reply(operation: &str, namespace: &str, err: &RagError) -> String {
    match err {
        RagError::InvalidArgument(_) => {
            "That doesn't look right. Please rephrase or resend.".to_string()
        }
        RagError::ProviderUnavailable { .. } => {
            warn!(namespace, operation, error = %err, "provider unavailable");
            "The language model is temporarily unavailable. Please try again in a moment."
                .to_string()
        }
        RagError::UnsupportedFormat { filename, .. } => {
            format!("I can't read '{filename}'. Please send a plain-text file (.txt or .md).")
        }
        RagError::PartialIngestion { stored, failed } => {
            warn!(
                namespace,
                operation,
                stored = stored.len(),
                failed = failed.len(),
                "partial ingestion"
            );
            format!(
                "Only part of your document was processed ({} of {} passages). \
                 Please resend it.",
                stored.len(),
                stored.len() + failed.len()
            )
        }
        RagError::DimensionMismatch { .. }
        | RagError::Provider { .. }
        | RagError::Store { .. }
        | RagError::Config(_) => {
            error!(namespace, operation, error = %err, "internal failure");
            "Something went wrong on my side. Please try again later.".to_string()
        }
    }
}
