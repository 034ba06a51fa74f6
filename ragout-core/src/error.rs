//! Error types for the `ragout-core` crate.

use thiserror::Error;

/// Errors that can occur in pipeline operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The caller supplied an invalid argument. Never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A provider call failed transiently (rate limiting, timeout, 5xx).
    ///
    /// Retried with backoff by [`RetryPolicy`](crate::retry::RetryPolicy);
    /// surfaced once the retry budget is spent.
    #[error("Provider unavailable ({provider}): {message}")]
    ProviderUnavailable {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A non-retryable provider failure (auth, malformed request or response).
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An embedding's dimensionality differs from the dimensionality
    /// established for the namespace. Fatal to the operation.
    #[error("Dimension mismatch in namespace '{namespace}': expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The namespace whose established dimensionality was violated.
        namespace: String,
        /// The dimensionality established by the namespace's first upsert.
        expected: usize,
        /// The offending vector's dimensionality.
        actual: usize,
    },

    /// An uploaded document could not be converted to text.
    #[error("Unsupported format for '{filename}': {detail}")]
    UnsupportedFormat {
        /// The name of the rejected file.
        filename: String,
        /// Why extraction failed.
        detail: String,
    },

    /// Ingestion stored some chunks but not all of them.
    ///
    /// `stored` and `failed` carry chunk sequence indices. Upserts are
    /// idempotent, so re-ingesting the same document retries safely.
    #[error("Partial ingestion: {} chunks stored, {} failed", stored.len(), failed.len())]
    PartialIngestion {
        /// Sequence indices of the chunks that were persisted.
        stored: Vec<usize>,
        /// Sequence indices of the chunks that were not.
        failed: Vec<usize>,
    },

    /// An error in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    Store {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RagError {
    /// Whether retrying the failed operation may succeed.
    ///
    /// Only provider outages are transient; everything else fails the same
    /// way on every attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, RagError::ProviderUnavailable { .. })
    }
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
