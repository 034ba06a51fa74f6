//! Generation provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// A chat model that produces an answer from an assembled prompt.
///
/// The narrow seam between the
/// [`AnswerSynthesizer`](crate::synthesizer::AnswerSynthesizer) and a
/// hosted model. Transient backend failures map to
/// [`RagError::ProviderUnavailable`](crate::error::RagError) so the
/// surrounding [`RetryPolicy`](crate::retry::RetryPolicy) can re-attempt
/// them.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Produce a completion for `prompt` under the given system instruction.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
