//! Error handling for the generation boundary
//!
//! Provider failures are classified into kinds with recovery hints. The
//! quality-gate core itself never fails on string input; only the pipeline
//! that calls out to a text generator returns errors.

pub mod classification;
pub mod detector;

pub use classification::{ProviderError, ProviderErrorKind, RecoveryHint};
pub use detector::{ErrorDetector, ErrorPattern};

use thiserror::Error;
use tracing::warn;

/// Errors returned by the variation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A generation call failed; the whole batch is abandoned.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A genuinely required input was empty.
    #[error("required input is empty: {0}")]
    EmptyInput(&'static str),

    /// A spawned generation task panicked or was cancelled.
    #[error("generation task failed: {0}")]
    Join(String),
}

impl PipelineError {
    /// Recovery hint of the underlying provider failure, if there is one.
    pub fn recovery_hint(&self) -> Option<RecoveryHint> {
        match self {
            PipelineError::Provider(err) => Some(err.recovery_hint()),
            PipelineError::EmptyInput(_) | PipelineError::Join(_) => None,
        }
    }

    /// Returns true if the caller may rerun the failed step without user involvement.
    pub fn is_retryable(&self) -> bool {
        self.recovery_hint().is_some_and(|hint| hint.is_retryable())
    }

    /// Logs the failure together with how to recover from it.
    pub(crate) fn log_abort(&self, stage: &str) {
        match self {
            PipelineError::Provider(err) => {
                let hint = err.recovery_hint();
                warn!(
                    stage,
                    kind = err.kind().as_str(),
                    retryable = hint.is_retryable(),
                    retry_after = ?hint.delay(),
                    error = %err,
                    "generation aborted"
                );
            }
            other => warn!(stage, error = %other, "generation aborted"),
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Join(err.to_string())
    }
}
