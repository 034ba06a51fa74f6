//! Answer synthesis: prompt assembly and the generation call.

use std::sync::Arc;

use tracing::{debug, info};

use crate::document::ScoredChunk;
use crate::error::Result;
use crate::generation::GenerationProvider;
use crate::retry::RetryPolicy;

/// Default reply when nothing relevant is stored for the namespace.
pub const DEFAULT_NO_CONTEXT_REPLY: &str = "I couldn't find anything relevant in your documents. \
     Upload a document and I'll answer questions about it.";

/// System instruction sent with every generation call.
const SYSTEM_PROMPT: &str =
    "You are Ragout, an assistant that answers questions about documents the user has uploaded.";

/// What to do when retrieval finds no context for a question.
///
/// The policy is fixed at construction time; it is a deployment choice,
/// never a per-call decision.
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyContextPolicy {
    /// Reply with a fixed message and skip the generation call entirely.
    CannedReply(String),
    /// Ask the model anyway, relying on its general knowledge.
    GeneralKnowledge,
}

impl Default for EmptyContextPolicy {
    fn default() -> Self {
        EmptyContextPolicy::CannedReply(DEFAULT_NO_CONTEXT_REPLY.to_string())
    }
}

/// Builds a bounded prompt from ranked chunks and invokes the chat model.
pub struct AnswerSynthesizer {
    generator: Arc<dyn GenerationProvider>,
    retry: RetryPolicy,
    max_context_chars: usize,
    empty_context: EmptyContextPolicy,
}

impl AnswerSynthesizer {
    /// Create a synthesizer with a fixed context budget and empty-context
    /// policy.
    pub fn new(
        generator: Arc<dyn GenerationProvider>,
        retry: RetryPolicy,
        max_context_chars: usize,
        empty_context: EmptyContextPolicy,
    ) -> Self {
        Self { generator, retry, max_context_chars, empty_context }
    }

    /// Answer `question` from the ranked `context` chunks.
    pub async fn answer(&self, question: &str, context: &[ScoredChunk]) -> Result<String> {
        if context.is_empty() {
            if let EmptyContextPolicy::CannedReply(reply) = &self.empty_context {
                debug!("no context retrieved, returning canned reply");
                return Ok(reply.clone());
            }
        }

        let prompt = build_prompt(question, context, self.max_context_chars);
        let answer = self
            .retry
            .run("generate_answer", || self.generator.complete(SYSTEM_PROMPT, &prompt))
            .await?;

        info!(context_chunks = context.len(), "synthesized answer");
        Ok(answer)
    }
}

/// Assemble the user prompt for the chat model.
fn build_prompt(question: &str, context: &[ScoredChunk], budget: usize) -> String {
    if context.is_empty() {
        return format!("Answer the question below.\n\nQuestion: {question}");
    }

    let excerpts = assemble_context(context, budget);
    format!(
        "Answer the question using ONLY the excerpts below, quoting the passage that \
         supports your answer. If the excerpts do not contain the answer, say that you \
         do not know.\n\nExcerpts:\n{excerpts}\n\nQuestion: {question}"
    )
}

/// Concatenate ranked chunk texts under a character budget.
///
/// Chunks are kept in rank order while they fit; the first chunk that
/// crosses the budget is cut to the remaining characters (on a character
/// boundary) and every lower-ranked chunk is dropped. The budget counts
/// chunk text only, not the separators between excerpts.
fn assemble_context(context: &[ScoredChunk], budget: usize) -> String {
    let mut assembled = String::new();
    let mut remaining = budget;

    for scored in context {
        if remaining == 0 {
            break;
        }
        let text = &scored.chunk.text;
        let char_count = text.chars().count();

        if !assembled.is_empty() {
            assembled.push_str("\n---\n");
        }

        if char_count <= remaining {
            assembled.push_str(text);
            remaining -= char_count;
        } else {
            let cut = text
                .char_indices()
                .nth(remaining)
                .map(|(offset, _)| offset)
                .unwrap_or(text.len());
            assembled.push_str(&text[..cut]);
            remaining = 0;
        }
    }

    assembled
}
