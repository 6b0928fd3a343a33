//! Provider error types for the generation boundary
//!
//! The text-generation call surrounding the quality gates can fail in a handful
//! of ways. Each failure carries a kind and a recovery hint so the orchestrator
//! can decide whether to retry, wait for the user, or stop.

use std::time::Duration;
use thiserror::Error;

/// What went wrong in a generation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Billing-period quota exhausted.
    Quota,
    /// Too many requests in a short window.
    RateLimited,
    /// The provider refused the prompt or withheld the output.
    Safety,
    /// Connection failures, timeouts and 5xx responses.
    Network,
    /// The call succeeded but returned no text.
    EmptyResponse,
    /// Anything the detector does not recognise.
    Other,
}

impl ProviderErrorKind {
    /// Recovery hint used when no more specific hint is known.
    pub fn default_hint(&self) -> RecoveryHint {
        match self {
            ProviderErrorKind::Quota => RecoveryHint::WaitForUser,
            ProviderErrorKind::RateLimited => RecoveryHint::RetryAfter(Duration::from_secs(60)),
            ProviderErrorKind::Safety => RecoveryHint::StopExecution,
            ProviderErrorKind::Network => RecoveryHint::RetryNow,
            ProviderErrorKind::EmptyResponse => RecoveryHint::RetryNow,
            ProviderErrorKind::Other => RecoveryHint::StopExecution,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Quota => "quota",
            ProviderErrorKind::RateLimited => "rate_limited",
            ProviderErrorKind::Safety => "safety",
            ProviderErrorKind::Network => "network",
            ProviderErrorKind::EmptyResponse => "empty_response",
            ProviderErrorKind::Other => "other",
        }
    }
}

/// Hints for how to recover from an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryHint {
    /// Retry immediately with the same parameters.
    RetryNow,
    /// Retry after a specified duration.
    RetryAfter(Duration),
    /// Wait for user input or intervention before proceeding.
    WaitForUser,
    /// Stop execution entirely; error is unrecoverable.
    StopExecution,
}

impl RecoveryHint {
    /// Returns true if a higher layer may retry without user involvement.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RecoveryHint::RetryNow | RecoveryHint::RetryAfter(_))
    }

    /// Delay before retrying, if any.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            RecoveryHint::RetryAfter(d) => Some(*d),
            RecoveryHint::RetryNow => Some(Duration::ZERO),
            _ => None,
        }
    }
}

/// Failure of an external `generate(prompt, temperature)` call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("quota exhausted: {message}")]
    Quota { message: String },

    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("blocked by safety filter: {message}")]
    Safety { message: String },

    #[error("network error: {message}")]
    Network {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("provider error: {message}")]
    Other { message: String },
}

impl ProviderError {
    /// Builds an error of `kind` with the given recovery hint.
    ///
    /// Only rate-limit and network errors keep a retry delay; other kinds
    /// always recover the way their kind dictates.
    pub fn from_kind(kind: ProviderErrorKind, message: impl Into<String>, hint: &RecoveryHint) -> Self {
        let message = message.into();
        let retry_after = match hint {
            RecoveryHint::RetryAfter(d) => Some(*d),
            _ => None,
        };
        match kind {
            ProviderErrorKind::Quota => ProviderError::Quota { message },
            ProviderErrorKind::RateLimited => ProviderError::RateLimited {
                message,
                retry_after,
            },
            ProviderErrorKind::Safety => ProviderError::Safety { message },
            ProviderErrorKind::Network => ProviderError::Network {
                message,
                retry_after,
            },
            ProviderErrorKind::EmptyResponse => ProviderError::EmptyResponse,
            ProviderErrorKind::Other => ProviderError::Other { message },
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Quota { .. } => ProviderErrorKind::Quota,
            ProviderError::RateLimited { .. } => ProviderErrorKind::RateLimited,
            ProviderError::Safety { .. } => ProviderErrorKind::Safety,
            ProviderError::Network { .. } => ProviderErrorKind::Network,
            ProviderError::EmptyResponse => ProviderErrorKind::EmptyResponse,
            ProviderError::Other { .. } => ProviderErrorKind::Other,
        }
    }

    /// Suggested recovery action for this error.
    pub fn recovery_hint(&self) -> RecoveryHint {
        match self {
            ProviderError::RateLimited {
                retry_after: Some(d),
                ..
            }
            | ProviderError::Network {
                retry_after: Some(d),
                ..
            } => RecoveryHint::RetryAfter(*d),
            other => other.kind().default_hint(),
        }
    }

    /// Returns true if a higher layer may retry the call.
    pub fn is_retryable(&self) -> bool {
        self.recovery_hint().is_retryable()
    }
}
