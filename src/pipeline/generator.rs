//! The text-generation boundary.
//!
//! The quality gates never call a model themselves. Orchestration code talks
//! to one through [`TextGenerator`], and providers that only report failures
//! as plain messages can be adapted with [`ClassifiedGenerator`].

use async_trait::async_trait;

use crate::error::{ErrorDetector, ProviderError};

/// A text-generation capability: `generate(prompt, temperature) -> text`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for `prompt` at the given sampling temperature.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;
}

/// A provider that reports failures as free-form messages.
#[async_trait]
pub trait RawTextGenerator: Send + Sync {
    async fn generate_raw(&self, prompt: &str, temperature: f32) -> Result<String, String>;
}

/// Adapts a [`RawTextGenerator`] by classifying its error messages.
#[derive(Debug)]
pub struct ClassifiedGenerator<R> {
    inner: R,
    detector: ErrorDetector,
}

impl<R> ClassifiedGenerator<R> {
    pub fn new(inner: R) -> Self {
        Self::with_detector(inner, ErrorDetector::new())
    }

    pub fn with_detector(inner: R, detector: ErrorDetector) -> Self {
        Self { inner, detector }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: RawTextGenerator> TextGenerator for ClassifiedGenerator<R> {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        self.inner
            .generate_raw(prompt, temperature)
            .await
            .map_err(|message| self.detector.classify(&message))
    }
}

/// Calls `generator` and rejects blank output as [`ProviderError::EmptyResponse`].
pub async fn generate_nonempty(
    generator: &dyn TextGenerator,
    prompt: &str,
    temperature: f32,
) -> Result<String, ProviderError> {
    let text = generator.generate(prompt, temperature).await?;
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}
