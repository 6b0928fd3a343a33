//! Terminal rendering for gate results, score breakdowns and similarity
//! matrices.

use crate::quality::gates::{GateProgressState, GateProgressUpdate, GateResult};
use crate::quality::text::truncate_chars;
use crate::quality::{DifferentiationReport, QualityScores};
use crate::ui::colors::Theme;

/// Display status of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Running,
    Passed,
    Failed,
    Skipped,
}

impl GateStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Running => "◉",
            Self::Passed => "✓",
            Self::Failed => "✗",
            Self::Skipped => "⊘",
        }
    }

    pub fn from_gate_result(result: &GateResult) -> Self {
        if result.message.starts_with("Skipped") {
            Self::Skipped
        } else if result.passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// Renders quality reports as boxed terminal panels.
#[derive(Debug)]
pub struct QualityGateRenderer {
    theme: Theme,
    /// Panel width in characters
    width: usize,
}

impl Default for QualityGateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityGateRenderer {
    pub fn new() -> Self {
        Self::with_theme(Theme::default())
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self { theme, width: 64 }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(24);
        self
    }

    fn status_icon(&self, status: GateStatus) -> String {
        let color = match status {
            GateStatus::Running => self.theme.in_progress,
            GateStatus::Passed => self.theme.success,
            GateStatus::Failed => self.theme.error,
            GateStatus::Skipped => self.theme.muted,
        };
        self.theme.paint(status.icon(), color)
    }

    /// One line per gate, plus up to ten detail lines for failures.
    pub fn render_gate(&self, result: &GateResult) -> String {
        let status = GateStatus::from_gate_result(result);
        let name = format_gate_name(&result.gate_name);
        let max_msg = self.width.saturating_sub(name.chars().count() + 6);
        let mut out = format!(
            "{} {}: {}\n",
            self.status_icon(status),
            name,
            truncate_chars(&result.message, max_msg)
        );

        if status == GateStatus::Failed {
            if let Some(details) = &result.details {
                let lines: Vec<&str> = details.lines().filter(|l| !l.trim().is_empty()).collect();
                for line in lines.iter().take(10) {
                    let line = truncate_chars(&format!("    {line}"), self.width - 4);
                    out.push_str(&self.theme.paint(&line, self.theme.muted));
                    out.push('\n');
                }
                if lines.len() > 10 {
                    out.push_str(&self.theme.paint("    ... (truncated)", self.theme.muted));
                    out.push('\n');
                }
            }
        }
        out
    }

    /// All gates in a box with a summary line at the bottom.
    pub fn render_gates(&self, results: &[GateResult]) -> String {
        let mut body = String::new();
        for result in results {
            body.push_str(&self.render_gate(result));
        }
        let summary = self.render_summary_bar(results);
        self.boxed("Quality Gates", &body, Some(&summary))
    }

    /// Single-line verdict over a set of gate results.
    pub fn render_summary_bar(&self, results: &[GateResult]) -> String {
        let passed = results.iter().filter(|r| r.passed).count();
        let failed: Vec<&str> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.gate_name.as_str())
            .collect();
        if failed.is_empty() {
            self.theme.paint(
                &format!("All {} gates passed", results.len()),
                self.theme.success,
            )
        } else {
            self.theme.paint(
                &format!(
                    "{passed}/{} gates passed. Failed: {}",
                    results.len(),
                    failed.join(", ")
                ),
                self.theme.warning,
            )
        }
    }

    /// A progress line for live gate updates.
    pub fn render_progress(&self, update: &GateProgressUpdate) -> String {
        let status = match update.state {
            GateProgressState::Running => GateStatus::Running,
            GateProgressState::Passed => GateStatus::Passed,
            GateProgressState::Failed => GateStatus::Failed,
        };
        let name = format_gate_name(&update.gate_name);
        match update.format_duration() {
            Some(elapsed) => format!(
                "{} {} {}",
                self.status_icon(status),
                name,
                self.theme.paint(&format!("({elapsed})"), self.theme.muted)
            ),
            None => format!("{} {} ...", self.status_icon(status), name),
        }
    }

    /// Score breakdown with a bar per dimension.
    pub fn render_scores(&self, scores: &QualityScores, pass_mark: f64) -> String {
        let rows = [
            ("Readability", scores.readability.score),
            ("SEO", scores.seo.score),
            ("Engagement", scores.engagement.score),
            ("Structure", scores.structure.score),
            ("Factual", scores.factual.score),
        ];
        let bar_width = self.width.saturating_sub(28).clamp(10, 40);

        let mut body = String::new();
        for (label, score) in rows {
            body.push_str(&format!(
                "{label:<12} {} {score:>5.1}\n",
                self.score_bar(score, bar_width, pass_mark)
            ));
        }
        body.push_str(&format!(
            "\n{:<12} {}/100  ({} reading level)\n",
            "Overall",
            self.theme.paint(
                &format!("{:.1}", scores.overall_score),
                self.theme.score_color(scores.overall_score, pass_mark)
            ),
            scores.readability.complexity
        ));
        if !scores.seo.keywords.is_empty() {
            body.push_str(&format!(
                "{:<12} {}\n",
                "Keywords",
                self.theme.paint(&scores.seo.keywords.join(", "), self.theme.muted)
            ));
        }
        self.boxed("Quality Scores", &body, None)
    }

    fn score_bar(&self, score: f64, width: usize, pass_mark: f64) -> String {
        let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));
        self.theme.paint(&bar, self.theme.score_color(score, pass_mark))
    }

    /// Similarity matrix as a percentage grid with flagged pairs listed below.
    pub fn render_similarity_matrix(&self, report: &DifferentiationReport) -> String {
        let n = report.similarity_matrix.len();
        let mut body = String::new();
        if n < 2 {
            body.push_str(&self.theme.paint(
                "Fewer than two variations; nothing to compare.",
                self.theme.muted,
            ));
            body.push('\n');
            return self.boxed("Variation Similarity", &body, None);
        }

        body.push_str("     ");
        for col in 1..=n {
            body.push_str(&self.theme.paint(&format!("{:>6}", format!("#{col}")), self.theme.accent));
        }
        body.push('\n');

        let max_similarity = 1.0 - report.threshold;
        for (i, row) in report.similarity_matrix.iter().enumerate() {
            body.push_str(&self.theme.paint(&format!("{:<5}", format!("#{}", i + 1)), self.theme.accent));
            for (j, similarity) in row.iter().enumerate() {
                let cell = format!("{:>5.0}%", similarity * 100.0);
                let color = if i == j {
                    self.theme.muted
                } else if *similarity > max_similarity {
                    self.theme.error
                } else {
                    self.theme.success
                };
                body.push_str(&self.theme.paint(&cell, color));
            }
            body.push('\n');
        }

        body.push_str(&format!(
            "\nMinimum difference {:.1}% (required {:.1}%)\n",
            report.min_difference * 100.0,
            report.threshold * 100.0
        ));
        for pair in &report.pairs_below_threshold {
            body.push_str(&self.theme.paint(
                &format!(
                    "  #{} <-> #{}: {:.1}% different\n",
                    pair.pair.0,
                    pair.pair.1,
                    pair.difference * 100.0
                ),
                self.theme.warning,
            ));
        }

        let verdict = if report.valid {
            self.theme.paint("All variations sufficiently different", self.theme.success)
        } else {
            self.theme.paint(
                &format!("{} pair(s) too similar", report.pairs_below_threshold.len()),
                self.theme.warning,
            )
        };
        self.boxed("Variation Similarity", &body, Some(&verdict))
    }

    fn boxed(&self, title: &str, body: &str, footer: Option<&str>) -> String {
        let inner = self.width - 2;
        let mut out = format!("╭{}╮\n", "─".repeat(inner));
        out.push_str(&self.box_line(&self.theme.paint(title, self.theme.accent)));
        out.push_str(&format!("├{}┤\n", "─".repeat(inner)));
        for line in body.lines() {
            out.push_str(&self.box_line(line));
        }
        if let Some(footer) = footer {
            out.push_str(&format!("├{}┤\n", "─".repeat(inner)));
            out.push_str(&self.box_line(footer));
        }
        out.push_str(&format!("╰{}╯", "─".repeat(inner)));
        out
    }

    fn box_line(&self, line: &str) -> String {
        let padding = (self.width - 4).saturating_sub(visible_length(line));
        format!("│ {line}{} │\n", " ".repeat(padding))
    }
}

/// "quality_score" -> "Quality Score"
fn format_gate_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Character count ignoring ANSI color sequences.
fn visible_length(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else {
            len += 1;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{PairDifference, QualityAnalyzer};
    use std::time::Duration;

    fn plain() -> QualityGateRenderer {
        QualityGateRenderer::with_theme(Theme::plain())
    }

    fn report(valid: bool) -> DifferentiationReport {
        DifferentiationReport {
            valid,
            min_difference: if valid { 0.8 } else { 0.1 },
            avg_difference: 0.5,
            min_similarity: 0.1,
            avg_similarity: 0.5,
            pairs_below_threshold: if valid {
                Vec::new()
            } else {
                vec![PairDifference {
                    pair: (1, 2),
                    similarity: 0.9,
                    difference: 0.1,
                }]
            },
            threshold: 0.3,
            similarity_matrix: vec![vec![1.0, 0.9], vec![0.9, 1.0]],
        }
    }

    #[test]
    fn test_status_from_results() {
        assert_eq!(GateStatus::from_gate_result(&GateResult::pass("q", "ok")), GateStatus::Passed);
        assert_eq!(
            GateStatus::from_gate_result(&GateResult::fail("q", "bad", None)),
            GateStatus::Failed
        );
        assert_eq!(
            GateStatus::from_gate_result(&GateResult::skipped("q", "no reference")),
            GateStatus::Skipped
        );
    }

    #[test]
    fn test_format_gate_name() {
        assert_eq!(format_gate_name("citations"), "Citations");
        assert_eq!(format_gate_name("quality_score"), "Quality Score");
    }

    #[test]
    fn test_visible_length_skips_escapes() {
        assert_eq!(visible_length("hello"), 5);
        assert_eq!(visible_length("\x1b[32mhello\x1b[0m"), 5);
    }

    #[test]
    fn test_render_gates_lists_failures_with_details() {
        let results = vec![
            GateResult::pass("citations", "3 citation(s), all linked"),
            GateResult::fail("quality", "Overall score 41/100", Some("Readability: 30".to_string())),
        ];
        let out = plain().render_gates(&results);
        assert!(out.contains("╭"));
        assert!(out.contains("✓ Citations"));
        assert!(out.contains("✗ Quality"));
        assert!(out.contains("Readability: 30"));
        assert!(out.contains("1/2 gates passed. Failed: quality"));
    }

    #[test]
    fn test_render_summary_all_passed() {
        let results = vec![GateResult::pass("citations", "ok"), GateResult::pass("quality", "ok")];
        assert_eq!(plain().render_summary_bar(&results), "All 2 gates passed");
    }

    #[test]
    fn test_render_progress() {
        let renderer = plain();
        assert_eq!(renderer.render_progress(&GateProgressUpdate::running("quality")), "◉ Quality ...");
        let done = GateProgressUpdate::passed("quality", Duration::from_millis(12));
        assert_eq!(renderer.render_progress(&done), "✓ Quality (12ms)");
    }

    #[test]
    fn test_render_scores_has_every_dimension() {
        let scores = QualityAnalyzer::new().analyze(
            "# Title\n\nIntroduction text here. We think you will like it.\n\n## Conclusion\n\nDone.",
            None,
            None,
        );
        let out = plain().render_scores(&scores, 60.0);
        for label in ["Readability", "SEO", "Engagement", "Structure", "Factual", "Overall"] {
            assert!(out.contains(label), "missing {label}");
        }
    }

    #[test]
    fn test_render_similarity_matrix_flags_pairs() {
        let out = plain().render_similarity_matrix(&report(false));
        assert!(out.contains("#1"));
        assert!(out.contains("90%"));
        assert!(out.contains("#1 <-> #2: 10.0% different"));
        assert!(out.contains("1 pair(s) too similar"));
    }

    #[test]
    fn test_render_similarity_matrix_single_variation() {
        let mut single = report(true);
        single.similarity_matrix.clear();
        let out = plain().render_similarity_matrix(&single);
        assert!(out.contains("nothing to compare"));
    }

    #[test]
    fn test_box_lines_have_equal_width() {
        let renderer = plain().with_width(40);
        let out = renderer.render_gates(&[GateResult::pass("citations", "ok")]);
        let widths: Vec<usize> = out.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == 40), "{widths:?}");
    }
}
