//! Draft quality gates.
//!
//! This module bundles the citation validator and the quality analyzer into
//! named gates that run over a single draft. Gate failures are advisory: the
//! results are shown to a human approver, nothing is blocked automatically.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::analyzer::{format_summary, QualityAnalyzer, QualityScores};
use super::citations::{format_report, CitationValidator, ValidationReport};
use super::profiles::GateConfig;

/// Name of the citation hyperlink gate.
pub const CITATIONS_GATE: &str = "citations";
/// Name of the composite quality score gate.
pub const QUALITY_GATE: &str = "quality";

/// Progress state for a quality gate.
///
/// Used in progress callbacks to report gate status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateProgressState {
    /// Gate is currently running
    Running,
    /// Gate completed successfully
    Passed,
    /// Gate failed
    Failed,
}

/// Progress update for a quality gate.
#[derive(Debug, Clone)]
pub struct GateProgressUpdate {
    /// Name of the quality gate
    pub gate_name: String,
    /// Current progress state
    pub state: GateProgressState,
    /// Duration of the gate execution (only set for Passed/Failed states)
    pub duration: Option<Duration>,
}

impl GateProgressUpdate {
    pub fn running(gate_name: impl Into<String>) -> Self {
        Self {
            gate_name: gate_name.into(),
            state: GateProgressState::Running,
            duration: None,
        }
    }

    pub fn passed(gate_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            gate_name: gate_name.into(),
            state: GateProgressState::Passed,
            duration: Some(duration),
        }
    }

    pub fn failed(gate_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            gate_name: gate_name.into(),
            state: GateProgressState::Failed,
            duration: Some(duration),
        }
    }

    /// Check if the gate has completed (Passed or Failed).
    pub fn is_completed(&self) -> bool {
        matches!(
            self.state,
            GateProgressState::Passed | GateProgressState::Failed
        )
    }

    /// Format the duration for display, if available.
    pub fn format_duration(&self) -> Option<String> {
        self.duration.map(|d| {
            if d.as_secs() >= 60 {
                format!(
                    "{}m{:.1}s",
                    d.as_secs() / 60,
                    (d.as_millis() % 60000) as f64 / 1000.0
                )
            } else if d.as_millis() < 100 {
                format!("{}ms", d.as_millis())
            } else {
                format!("{:.1}s", d.as_secs_f64())
            }
        })
    }
}

/// The result of running a single quality gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
    /// Name of the quality gate that was run
    pub gate_name: String,
    /// Whether the gate passed
    pub passed: bool,
    /// Human-readable message describing the result
    pub message: String,
    /// Full rendered report for failed gates
    pub details: Option<String>,
}

impl GateResult {
    pub fn pass(gate_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            gate_name: gate_name.into(),
            passed: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(
        gate_name: impl Into<String>,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            gate_name: gate_name.into(),
            passed: false,
            message: message.into(),
            details,
        }
    }

    /// Create a new skipped gate result. Skipped gates count as passed.
    pub fn skipped(gate_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            gate_name: gate_name.into(),
            passed: true,
            message: format!("Skipped: {}", reason.into()),
            details: None,
        }
    }
}

/// A draft plus the optional material it is checked against.
#[derive(Debug, Clone, Default)]
pub struct DraftInput {
    pub content: String,
    /// Reference document whose URLs are the only valid citation targets
    pub reference: Option<String>,
    /// Structural template with `##` sections
    pub template: Option<String>,
}

impl DraftInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Runs the citation and quality gates over drafts.
#[derive(Debug, Clone)]
pub struct DraftGateChecker {
    validator: CitationValidator,
    analyzer: QualityAnalyzer,
    min_overall_score: f64,
}

impl Default for DraftGateChecker {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}

impl DraftGateChecker {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            validator: CitationValidator::new(),
            analyzer: QualityAnalyzer::with_weights(config.scoring.weights),
            min_overall_score: config.scoring.min_overall_score,
        }
    }

    pub fn analyzer(&self) -> &QualityAnalyzer {
        &self.analyzer
    }

    pub fn validator(&self) -> &CitationValidator {
        &self.validator
    }

    /// Validates citations in the draft. A missing reference is an empty corpus.
    pub fn validate_citations(&self, draft: &DraftInput) -> ValidationReport {
        self.validator
            .validate(&draft.content, draft.reference.as_deref().unwrap_or(""))
    }

    /// Scores the draft on every quality dimension.
    pub fn score(&self, draft: &DraftInput) -> QualityScores {
        self.analyzer.analyze(
            &draft.content,
            draft.template.as_deref(),
            draft.reference.as_deref(),
        )
    }

    /// Check that every citation is hyperlinked to a reference URL.
    pub fn check_citations(&self, draft: &DraftInput) -> GateResult {
        let report = self.validate_citations(draft);
        if report.passed {
            GateResult::pass(
                CITATIONS_GATE,
                format!(
                    "{} citation(s), all linked to reference URLs",
                    report.total_citations
                ),
            )
        } else {
            GateResult::fail(
                CITATIONS_GATE,
                format!(
                    "{} hallucinated URL(s), {} unlinked mention(s)",
                    report.hallucinated_count, report.unlinked_count
                ),
                Some(format_report(&report)),
            )
        }
    }

    /// Check the overall quality score against the configured minimum.
    pub fn check_quality(&self, draft: &DraftInput) -> GateResult {
        let scores = self.score(draft);
        let message = format!(
            "Overall score {}/100 (minimum {})",
            scores.overall_score, self.min_overall_score
        );
        if scores.overall_score >= self.min_overall_score {
            GateResult::pass(QUALITY_GATE, message)
        } else {
            GateResult::fail(QUALITY_GATE, message, Some(format_summary(&scores)))
        }
    }

    /// Run all gates without progress reporting.
    pub fn run_all(&self, draft: &DraftInput) -> Vec<GateResult> {
        self.run_all_gates_with_progress(draft, |_| {})
    }

    /// Run all gates, emitting `Running` before and `Passed`/`Failed` with the
    /// elapsed time after each one.
    pub fn run_all_gates_with_progress<F>(&self, draft: &DraftInput, mut callback: F) -> Vec<GateResult>
    where
        F: FnMut(GateProgressUpdate),
    {
        let gates: [(&str, fn(&Self, &DraftInput) -> GateResult); 2] = [
            (CITATIONS_GATE, Self::check_citations),
            (QUALITY_GATE, Self::check_quality),
        ];

        let mut results = Vec::with_capacity(gates.len());
        for (name, check) in gates {
            callback(GateProgressUpdate::running(name));
            let start = Instant::now();
            let result = check(self, draft);
            let duration = start.elapsed();
            if result.passed {
                callback(GateProgressUpdate::passed(name, duration));
            } else {
                callback(GateProgressUpdate::failed(name, duration));
            }
            tracing::debug!(gate = name, passed = result.passed, "gate finished");
            results.push(result);
        }
        results
    }

    /// Check if all gates passed.
    pub fn all_passed(results: &[GateResult]) -> bool {
        results.iter().all(|r| r.passed)
    }

    /// Get a summary of gate results.
    pub fn summary(results: &[GateResult]) -> String {
        let passed = results.iter().filter(|r| r.passed).count();
        let total = results.len();
        let failed: Vec<&str> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.gate_name.as_str())
            .collect();

        if failed.is_empty() {
            format!("All {total} gates passed")
        } else {
            format!(
                "{passed}/{total} gates passed. Failed: {}",
                failed.join(", ")
            )
        }
    }
}
