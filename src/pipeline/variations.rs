//! Variation batch generation.
//!
//! A batch asks the generator for N stylistic rewrites of an approved article.
//! Calls run concurrently on tokio tasks unless the configuration asks for
//! sequential generation. One failed call fails the whole batch.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::generator::{generate_nonempty, TextGenerator};
use crate::error::{PipelineError, ProviderError};
use crate::quality::GenerationConfig;

/// Prompt for one variation in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationPrompt<'a> {
    /// 1-based variation number
    pub number: usize,
    pub count: usize,
    pub rules: &'a str,
    pub article: &'a str,
}

impl<'a> VariationPrompt<'a> {
    pub fn new(number: usize, count: usize, rules: &'a str, article: &'a str) -> Self {
        Self {
            number,
            count,
            rules,
            article,
        }
    }

    /// Stylistic focus for a 1-based variation number.
    pub fn emphasis(number: usize) -> &'static str {
        match number {
            1 => "Clarity and directness - make it highly accessible",
            2 => "Depth and detail - add more nuance and examples",
            3 => "Engagement and storytelling - make it more compelling",
            _ => "Balanced approach",
        }
    }

    /// Renders the full prompt.
    pub fn build(&self) -> String {
        let n = self.number;
        format!(
            "You are a content transformation specialist creating variation #{n} of {count}.\n\
             \n\
             # STYLISTIC RULES\n\
             {rules}\n\
             \n\
             # ORIGINAL ARTICLE\n\
             {article}\n\
             \n\
             # YOUR TASK FOR VARIATION {n}\n\
             Transform the article according to the stylistic rules while:\n\
             1. Maintaining all key information and facts\n\
             2. Applying the style guidelines distinctly\n\
             3. Creating a DIFFERENT feel/approach than other variations would have\n\
             4. Ensuring professional quality\n\
             \n\
             For variation {n}, emphasize: {emphasis}\n\
             \n\
             Generate the COMPLETE transformed article now:",
            count = self.count,
            rules = self.rules,
            article = self.article,
            emphasis = Self::emphasis(n),
        )
    }

    /// Renders the prompt with an extra instruction to move away from the
    /// listed (1-based) variations.
    pub fn build_for_regeneration(&self, similar_to: &[usize]) -> String {
        let others = similar_to
            .iter()
            .map(|n| format!("#{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}\n\n# DIFFERENTIATION REQUIREMENT\n\
             A previous attempt at variation #{} read too much like variation {}. \
             Rewrite it with a clearly different structure, opening and vocabulary \
             while keeping every fact intact.",
            self.build(),
            self.number,
            if others.is_empty() { "another variation".to_string() } else { others },
        )
    }
}

/// Generates `config.variation_count` variations of `article` under `rules`.
///
/// Results are returned in variation order. The first failed call aborts the
/// tasks still running and its error is returned.
pub async fn generate_variations(
    generator: Arc<dyn TextGenerator>,
    article: &str,
    rules: &str,
    config: &GenerationConfig,
) -> Result<Vec<String>, PipelineError> {
    if rules.trim().is_empty() {
        return Err(PipelineError::EmptyInput("variation rules"));
    }
    if article.trim().is_empty() {
        return Err(PipelineError::EmptyInput("article"));
    }

    let count = config.variation_count;
    let temperature = config.variation_temperature;
    let prompts: Vec<String> = (1..=count)
        .map(|n| VariationPrompt::new(n, count, rules, article).build())
        .collect();

    info!(count, parallel = config.parallel_variations, "generating variations");

    if !config.parallel_variations {
        let mut variations = Vec::with_capacity(count);
        for prompt in &prompts {
            match generate_nonempty(generator.as_ref(), prompt, temperature).await {
                Ok(text) => variations.push(text),
                Err(err) => {
                    let err = PipelineError::from(err);
                    err.log_abort("variations");
                    return Err(err);
                }
            }
        }
        return Ok(variations);
    }

    let semaphore = Arc::new(Semaphore::new(count.max(1)));
    let handles: Vec<_> = prompts
        .into_iter()
        .enumerate()
        .map(|(idx, prompt)| {
            let generator = Arc::clone(&generator);
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                // Hold the permit until the call completes
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ProviderError::Other {
                        message: e.to_string(),
                    })?;
                let result = generate_nonempty(generator.as_ref(), &prompt, temperature).await;
                debug!(variation = idx + 1, ok = result.is_ok(), "variation call finished");
                result
            })
        })
        .collect();

    let abort_handles: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
    let joined = futures::future::try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(result) => result.map_err(PipelineError::from),
            Err(join_err) => Err(PipelineError::from(join_err)),
        }
    }))
    .await;

    if let Err(err) = &joined {
        for handle in &abort_handles {
            handle.abort();
        }
        err.log_abort("variations");
    }
    joined
}
