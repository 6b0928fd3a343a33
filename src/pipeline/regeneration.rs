//! Bounded regenerate-and-recheck loop for variation batches.
//!
//! The loop is a small state machine:
//!
//! ```text
//! Generated -> Validated -> Accepted
//!                        -> RegenerateOne(i) -> Validated -> ...
//!                        -> Exhausted
//! ```
//!
//! [`RegenerationLoop::step`] is the pure transition function;
//! [`RegenerationLoop::run`] drives it against a [`TextGenerator`]. Running
//! out of retries is not an error: the best-effort set is returned together
//! with its final report for a human to judge.

use tracing::{debug, info, warn};

use super::generator::{generate_nonempty, TextGenerator};
use super::variations::VariationPrompt;
use crate::error::PipelineError;
use crate::quality::differentiation::suggest_from_report;
use crate::quality::{
    DifferentiationConfig, DifferentiationReport, GenerationConfig, VariationDifferentiator,
};

/// A state of the regeneration loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    /// A fresh batch that has not been checked yet.
    Generated,
    /// The batch has been checked.
    Validated { report: DifferentiationReport },
    /// Variation `index` (0-based) must be regenerated before re-checking.
    RegenerateOne {
        index: usize,
        /// 1-based numbers of the variations it was too close to
        similar_to: Vec<usize>,
    },
    /// Every pair is sufficiently different.
    Accepted { report: DifferentiationReport },
    /// The retry budget ran out with pairs still too similar.
    Exhausted { report: DifferentiationReport },
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Accepted { .. } | LoopState::Exhausted { .. })
    }
}

/// Result of a completed regeneration loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RegenerationOutcome {
    pub variations: Vec<String>,
    pub report: DifferentiationReport,
    /// True if the final set passed validation
    pub accepted: bool,
    pub retries_used: u32,
    /// 0-based indices regenerated, in order
    pub regenerated: Vec<usize>,
}

/// Drives validation and single-variation regeneration up to a retry cap.
#[derive(Debug, Clone)]
pub struct RegenerationLoop {
    differentiator: VariationDifferentiator,
    max_retries: u32,
}

impl Default for RegenerationLoop {
    fn default() -> Self {
        Self::with_config(DifferentiationConfig::default())
    }
}

impl RegenerationLoop {
    pub fn new(differentiator: VariationDifferentiator, max_retries: u32) -> Self {
        Self {
            differentiator,
            max_retries,
        }
    }

    pub fn with_config(config: DifferentiationConfig) -> Self {
        let max_retries = config.max_retries;
        Self::new(VariationDifferentiator::with_config(config), max_retries)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Computes the next state.
    ///
    /// `variations` is the batch as it stands now and `retries_used` counts
    /// regenerations already performed. Terminal states map to themselves.
    pub fn step<S: AsRef<str>>(
        &self,
        state: LoopState,
        variations: &[S],
        retries_used: u32,
    ) -> LoopState {
        match state {
            LoopState::Generated | LoopState::RegenerateOne { .. } => LoopState::Validated {
                report: self.differentiator.validate_set(variations),
            },
            LoopState::Validated { report } => {
                if report.valid {
                    return LoopState::Accepted { report };
                }
                if retries_used >= self.max_retries {
                    return LoopState::Exhausted { report };
                }
                match suggest_from_report(&report, variations.len()) {
                    Some(index) => {
                        let number = index + 1;
                        let similar_to = report
                            .pairs_below_threshold
                            .iter()
                            .filter_map(|p| match p.pair {
                                (a, b) if a == number => Some(b),
                                (a, b) if b == number => Some(a),
                                _ => None,
                            })
                            .collect();
                        LoopState::RegenerateOne { index, similar_to }
                    }
                    None => LoopState::Exhausted { report },
                }
            }
            terminal @ (LoopState::Accepted { .. } | LoopState::Exhausted { .. }) => terminal,
        }
    }

    /// Validates `variations` and regenerates flagged ones until the set
    /// passes or the retry budget is spent.
    ///
    /// Only the suggested variation is regenerated on each round; the others
    /// are kept as they are. A provider failure during regeneration aborts
    /// the loop with that error.
    pub async fn run(
        &self,
        generator: &dyn TextGenerator,
        article: &str,
        rules: &str,
        config: &GenerationConfig,
        mut variations: Vec<String>,
    ) -> Result<RegenerationOutcome, PipelineError> {
        let count = variations.len();
        let mut retries_used = 0;
        let mut regenerated = Vec::new();
        let mut state = LoopState::Generated;

        let (report, accepted) = loop {
            state = match self.step(state, &variations, retries_used) {
                LoopState::Accepted { report } => break (report, true),
                LoopState::Exhausted { report } => {
                    warn!(
                        retries_used,
                        flagged = report.pairs_below_threshold.len(),
                        "regeneration budget exhausted; keeping best-effort variations"
                    );
                    break (report, false);
                }
                LoopState::RegenerateOne { index, similar_to } => {
                    info!(variation = index + 1, ?similar_to, "regenerating variation");
                    let prompt = VariationPrompt::new(index + 1, count, rules, article)
                        .build_for_regeneration(&similar_to);
                    let result =
                        generate_nonempty(generator, &prompt, config.variation_temperature).await;
                    variations[index] = match result {
                        Ok(text) => text,
                        Err(err) => {
                            let err = PipelineError::from(err);
                            err.log_abort("regeneration");
                            return Err(err);
                        }
                    };
                    retries_used += 1;
                    regenerated.push(index);
                    LoopState::RegenerateOne { index, similar_to }
                }
                LoopState::Validated { report } => {
                    debug!(
                        valid = report.valid,
                        flagged = report.pairs_below_threshold.len(),
                        retries_used,
                        "variation set checked"
                    );
                    LoopState::Validated { report }
                }
                LoopState::Generated => LoopState::Generated,
            };
        };

        Ok(RegenerationOutcome {
            variations,
            report,
            accepted,
            retries_used,
            regenerated,
        })
    }
}
