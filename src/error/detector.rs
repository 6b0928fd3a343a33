//! Error pattern detector for text-generation provider failures
//!
//! Providers surface failures as free-form messages. This module matches those
//! messages against an ordered table of regex patterns and turns the first
//! match into a typed [`ProviderError`].

use regex::Regex;
use std::time::Duration;
use tracing::debug;

use super::{ProviderError, ProviderErrorKind, RecoveryHint};

/// A pattern for matching errors in provider messages.
#[derive(Debug, Clone)]
pub struct ErrorPattern {
    /// The compiled regex pattern.
    regex: Regex,
    /// The error kind to assign when this pattern matches.
    kind: ProviderErrorKind,
    /// The recovery hint for this type of error.
    recovery_hint: RecoveryHint,
    /// A human-readable description of what this pattern detects.
    description: String,
}

impl ErrorPattern {
    /// Creates a new error pattern.
    ///
    /// # Panics
    /// Panics if the regex pattern is invalid.
    pub fn new(
        pattern: &str,
        kind: ProviderErrorKind,
        recovery_hint: RecoveryHint,
        description: impl Into<String>,
    ) -> Self {
        Self {
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
            kind,
            recovery_hint,
            description: description.into(),
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn recovery_hint(&self) -> &RecoveryHint {
        &self.recovery_hint
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Checks if this pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Classifies provider failure messages using pattern matching.
#[derive(Debug, Clone)]
pub struct ErrorDetector {
    /// The list of patterns to match against, in priority order.
    patterns: Vec<ErrorPattern>,
}

impl Default for ErrorDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorDetector {
    /// Creates a detector with patterns for common provider failures.
    pub fn new() -> Self {
        Self {
            patterns: Self::default_patterns(),
        }
    }

    /// Creates an error detector with custom patterns.
    pub fn with_patterns(patterns: Vec<ErrorPattern>) -> Self {
        Self { patterns }
    }

    fn default_patterns() -> Vec<ErrorPattern> {
        vec![
            // Quota comes first: providers often report exhausted quotas with a 429
            ErrorPattern::new(
                r"(?i)quota",
                ProviderErrorKind::Quota,
                RecoveryHint::WaitForUser,
                "Quota exceeded",
            ),
            ErrorPattern::new(
                r"(?i)resource\s+(has\s+been\s+)?exhausted",
                ProviderErrorKind::Quota,
                RecoveryHint::WaitForUser,
                "Resource exhausted",
            ),
            ErrorPattern::new(
                r"(?i)billing",
                ProviderErrorKind::Quota,
                RecoveryHint::WaitForUser,
                "Billing problem",
            ),
            // Rate limits
            ErrorPattern::new(
                r"(?i)\b429\b",
                ProviderErrorKind::RateLimited,
                RecoveryHint::RetryAfter(Duration::from_secs(60)),
                "HTTP 429 status code",
            ),
            ErrorPattern::new(
                r"(?i)\brate[\s\-]?limit",
                ProviderErrorKind::RateLimited,
                RecoveryHint::RetryAfter(Duration::from_secs(60)),
                "Rate limit error message",
            ),
            ErrorPattern::new(
                r"(?i)too\s+many\s+requests",
                ProviderErrorKind::RateLimited,
                RecoveryHint::RetryAfter(Duration::from_secs(60)),
                "Too many requests error",
            ),
            // Safety filters
            ErrorPattern::new(
                r"(?i)\bsafety\b",
                ProviderErrorKind::Safety,
                RecoveryHint::StopExecution,
                "Safety filter",
            ),
            ErrorPattern::new(
                r"HARM_CATEGORY_[A-Z_]+",
                ProviderErrorKind::Safety,
                RecoveryHint::StopExecution,
                "Harm category block",
            ),
            ErrorPattern::new(
                r"(?i)(prompt|response|content)\s+(was\s+)?blocked",
                ProviderErrorKind::Safety,
                RecoveryHint::StopExecution,
                "Blocked content",
            ),
            // Empty output
            ErrorPattern::new(
                r"(?i)empty\s+(response|output|completion)",
                ProviderErrorKind::EmptyResponse,
                RecoveryHint::RetryNow,
                "Empty response",
            ),
            ErrorPattern::new(
                r"(?i)no\s+candidates",
                ProviderErrorKind::EmptyResponse,
                RecoveryHint::RetryNow,
                "No candidates returned",
            ),
            // Network and server failures
            ErrorPattern::new(
                r"(?i)connection\s*(refused|reset|closed|timed?\s*out)",
                ProviderErrorKind::Network,
                RecoveryHint::RetryNow,
                "Connection error",
            ),
            ErrorPattern::new(
                r"(?i)network\s*(error|failure|unreachable)",
                ProviderErrorKind::Network,
                RecoveryHint::RetryNow,
                "Network error",
            ),
            ErrorPattern::new(
                r"(?i)(request\s*time(d?\s*)?out|deadline\s*(exceeded|expired))",
                ProviderErrorKind::Network,
                RecoveryHint::RetryNow,
                "Request timeout",
            ),
            ErrorPattern::new(
                r"(?i)(\b503\b|service\s*unavailable)",
                ProviderErrorKind::Network,
                RecoveryHint::RetryAfter(Duration::from_secs(30)),
                "Service unavailable",
            ),
            ErrorPattern::new(
                r"\b5[0-9]{2}\b",
                ProviderErrorKind::Network,
                RecoveryHint::RetryAfter(Duration::from_secs(10)),
                "HTTP 5xx server error",
            ),
        ]
    }

    /// Adds a custom pattern with the lowest priority.
    pub fn add_pattern(&mut self, pattern: ErrorPattern) {
        self.patterns.push(pattern);
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn patterns(&self) -> &[ErrorPattern] {
        &self.patterns
    }

    /// Returns the first pattern matching `text`, in priority order.
    pub fn detect(&self, text: &str) -> Option<&ErrorPattern> {
        self.patterns.iter().find(|p| p.matches(text))
    }

    /// Turns a raw provider message into a typed error.
    ///
    /// Unrecognised messages become [`ProviderError::Other`].
    pub fn classify(&self, text: &str) -> ProviderError {
        match self.detect(text) {
            Some(pattern) => {
                debug!(
                    kind = pattern.kind.as_str(),
                    pattern = pattern.description.as_str(),
                    "classified provider error"
                );
                ProviderError::from_kind(pattern.kind(), text.trim(), pattern.recovery_hint())
            }
            None => ProviderError::Other {
                message: text.trim().to_string(),
            },
        }
    }
}
