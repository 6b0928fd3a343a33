//! Variation differentiation checks.
//!
//! A batch of stylistic rewrites is only useful if the rewrites actually
//! differ. [`VariationDifferentiator`] measures pairwise similarity with
//! TF-IDF cosine (falling back to word-set Jaccard overlap when the texts
//! have no usable vocabulary), flags pairs closer than the configured
//! minimum difference, and picks which variation to regenerate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::profiles::DifferentiationConfig;
use super::text::round_to;
use super::tfidf::TfidfVectorizer;

/// A pair of variations whose difference falls below the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDifference {
    /// 1-indexed variation numbers, lower first
    pub pair: (usize, usize),
    pub similarity: f64,
    pub difference: f64,
}

/// Outcome of validating a batch of variations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentiationReport {
    /// True when no pair falls below the threshold
    pub valid: bool,
    /// 1 - lowest pairwise similarity
    pub min_difference: f64,
    /// 1 - mean pairwise similarity
    pub avg_difference: f64,
    pub min_similarity: f64,
    pub avg_similarity: f64,
    pub pairs_below_threshold: Vec<PairDifference>,
    pub threshold: f64,
    /// Full symmetric matrix with 1.0 on the diagonal; empty for fewer than two texts
    pub similarity_matrix: Vec<Vec<f64>>,
}

/// Validates that variations differ by at least a minimum amount.
#[derive(Debug, Clone)]
pub struct VariationDifferentiator {
    config: DifferentiationConfig,
    vectorizer: TfidfVectorizer,
}

impl Default for VariationDifferentiator {
    fn default() -> Self {
        Self::with_config(DifferentiationConfig::default())
    }
}

impl VariationDifferentiator {
    /// Creates a differentiator requiring `min_difference` (0-1) between any two texts.
    pub fn new(min_difference: f64) -> Self {
        Self::with_config(DifferentiationConfig {
            min_difference,
            ..DifferentiationConfig::default()
        })
    }

    pub fn with_config(config: DifferentiationConfig) -> Self {
        let vectorizer = TfidfVectorizer::new(config.max_features, config.ngram_max);
        Self { config, vectorizer }
    }

    pub fn threshold(&self) -> f64 {
        self.config.min_difference
    }

    pub fn config(&self) -> &DifferentiationConfig {
        &self.config
    }

    /// Similarity in `[0, 1]`; 1.0 means identical wording.
    ///
    /// The vectorizer is fit on just the two texts, so the result depends only
    /// on the pair and is symmetric in its arguments.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        match self.vectorizer.fit_transform(&[a, b]) {
            Some(matrix) => matrix.cosine(0, 1),
            None => {
                warn!("no vocabulary for TF-IDF, falling back to word overlap");
                jaccard_similarity(a, b)
            }
        }
    }

    /// `1 - similarity(a, b)`.
    pub fn difference(&self, a: &str, b: &str) -> f64 {
        1.0 - self.similarity(a, b)
    }

    /// Symmetric pairwise similarity matrix; each pair is computed once.
    pub fn similarity_matrix<S: AsRef<str>>(&self, variations: &[S]) -> Vec<Vec<f64>> {
        let n = variations.len();
        let mut matrix = vec![vec![1.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let sim = self.similarity(variations[i].as_ref(), variations[j].as_ref());
                matrix[i][j] = sim;
                matrix[j][i] = sim;
            }
        }
        matrix
    }

    /// Checks every pair of variations against the threshold.
    pub fn validate_set<S: AsRef<str>>(&self, variations: &[S]) -> DifferentiationReport {
        let n = variations.len();
        if n < 2 {
            return DifferentiationReport {
                valid: true,
                min_difference: 1.0,
                avg_difference: 1.0,
                min_similarity: 0.0,
                avg_similarity: 0.0,
                pairs_below_threshold: Vec::new(),
                threshold: self.config.min_difference,
                similarity_matrix: Vec::new(),
            };
        }

        let matrix = self.similarity_matrix(variations);
        let mut similarities = Vec::with_capacity(n * (n - 1) / 2);
        let mut pairs_below_threshold = Vec::new();

        for (i, row) in matrix.iter().enumerate() {
            for (j, &sim) in row.iter().enumerate().skip(i + 1) {
                similarities.push(sim);
                let difference = 1.0 - sim;
                if difference < self.config.min_difference {
                    pairs_below_threshold.push(PairDifference {
                        pair: (i + 1, j + 1),
                        similarity: round_to(sim, 3),
                        difference: round_to(difference, 3),
                    });
                }
            }
        }

        let min_similarity = similarities.iter().copied().fold(f64::INFINITY, f64::min);
        let avg_similarity = similarities.iter().sum::<f64>() / similarities.len() as f64;
        let valid = pairs_below_threshold.is_empty();

        debug!(
            variations = n,
            flagged = pairs_below_threshold.len(),
            min_similarity,
            avg_similarity,
            "variation set validated"
        );

        DifferentiationReport {
            valid,
            min_difference: round_to(1.0 - min_similarity, 3),
            avg_difference: round_to(1.0 - avg_similarity, 3),
            min_similarity: round_to(min_similarity, 3),
            avg_similarity: round_to(avg_similarity, 3),
            pairs_below_threshold,
            threshold: self.config.min_difference,
            similarity_matrix: matrix,
        }
    }

    /// The most similar pair as 0-indexed `(i, j, similarity)`.
    ///
    /// Ties go to the first pair in row-major order. `None` for fewer than two texts.
    pub fn least_different_pair<S: AsRef<str>>(
        &self,
        variations: &[S],
    ) -> Option<(usize, usize, f64)> {
        let n = variations.len();
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            for j in (i + 1)..n {
                let sim = self.similarity(variations[i].as_ref(), variations[j].as_ref());
                if best.map_or(true, |(_, _, max)| sim > max) {
                    best = Some((i, j, sim));
                }
            }
        }
        best
    }

    /// Index (0-based) of the variation to regenerate, or `None` if the set is valid.
    pub fn suggest_regeneration<S: AsRef<str>>(&self, variations: &[S]) -> Option<usize> {
        let report = self.validate_set(variations);
        suggest_from_report(&report, variations.len())
    }
}

/// Picks the variation involved in the most below-threshold pairs.
///
/// Ties go to the lowest index. Returns `None` when the report is valid.
pub fn suggest_from_report(report: &DifferentiationReport, variation_count: usize) -> Option<usize> {
    if report.valid {
        return None;
    }

    let mut involvement = vec![0usize; variation_count];
    for pair in &report.pairs_below_threshold {
        for index in [pair.pair.0, pair.pair.1] {
            if let Some(count) = index.checked_sub(1).and_then(|i| involvement.get_mut(i)) {
                *count += 1;
            }
        }
    }

    let max = involvement.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return None;
    }
    involvement.iter().position(|&count| count == max)
}

/// Word-set overlap `|A ∩ B| / |A ∪ B|` over lowercased whitespace words.
///
/// 0.0 when either text has no words.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let words_b: HashSet<&str> = b_lower.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let shared = words_a.intersection(&words_b).count();
    let total = words_a.union(&words_b).count();
    shared as f64 / total as f64
}

/// Renders a report with percentages for console display.
pub fn format_report(report: &DifferentiationReport) -> String {
    let rule = "=".repeat(60);
    let mut out = format!("\n{rule}\nVARIATION DIFFERENTIATION REPORT\n{rule}\n\n");

    out.push_str(&format!("Minimum Difference: {:.1}%\n", report.min_difference * 100.0));
    out.push_str(&format!("Average Difference: {:.1}%\n", report.avg_difference * 100.0));
    out.push_str(&format!("Required Threshold: {:.1}%\n\n", report.threshold * 100.0));

    if report.valid {
        out.push_str("[OK] All variations are sufficiently different!\n");
    } else {
        out.push_str(&format!(
            "[WARNING] {} pair(s) below threshold:\n\n",
            report.pairs_below_threshold.len()
        ));
        for pair in &report.pairs_below_threshold {
            out.push_str(&format!(
                "  Variation {} <-> Variation {}: {:.1}% different (similarity: {:.1}%)\n",
                pair.pair.0,
                pair.pair.1,
                pair.difference * 100.0,
                pair.similarity * 100.0
            ));
        }
    }

    out.push_str(&format!("\n{rule}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "Fast mobile pages keep shoppers engaged. Teams that trim heavy \
                        scripts see checkout conversion climb steadily, while slow \
                        product listings quietly drive visitors toward competitors.";
    const SYNONYM_SWAP: &str = "Fast mobile pages keep shoppers engaged. Teams that trim heavy \
                                scripts see checkout conversion rise steadily, while slow \
                                product listings quietly drive visitors toward competitors.";
    const DISTINCT: &str = "Imagine a gardener pruning roses at dawn: patient cuts, \
                            careful watering, and compost turned weekly produce blooms \
                            that neighbours admire all summer.";

    fn differentiator() -> VariationDifferentiator {
        VariationDifferentiator::new(0.3)
    }

    #[test]
    fn test_identical_texts_are_fully_similar() {
        let d = differentiator();
        assert!((d.similarity(BASE, BASE) - 1.0).abs() < 1e-9);
        assert!(d.difference(BASE, BASE).abs() < 1e-9);
    }

    #[test]
    fn test_near_duplicates_are_highly_similar() {
        let d = differentiator();
        assert!(d.similarity(BASE, SYNONYM_SWAP) > 0.7);
        assert!(d.similarity(BASE, DISTINCT) < 0.2);
    }

    #[test]
    fn test_stop_word_only_texts_fall_back_to_jaccard() {
        let d = differentiator();
        // no token survives stop-word removal
        assert_eq!(d.similarity("the and of", "the and it"), 0.5);
        assert_eq!(d.similarity("", "anything"), 0.0);
    }

    #[test]
    fn test_jaccard_similarity() {
        assert_eq!(jaccard_similarity("a b c", "B C d"), 0.5);
        assert_eq!(jaccard_similarity("", "a"), 0.0);
        assert_eq!(jaccard_similarity("same", "SAME"), 1.0);
    }

    #[test]
    fn test_validate_set_trivial_for_fewer_than_two() {
        let d = differentiator();
        for set in [vec![], vec![BASE]] {
            let report = d.validate_set(&set);
            assert!(report.valid);
            assert_eq!(report.min_difference, 1.0);
            assert_eq!(report.avg_difference, 1.0);
            assert!(report.pairs_below_threshold.is_empty());
        }
    }

    #[test]
    fn test_validate_set_flags_near_duplicate_pair() {
        let d = differentiator();
        let report = d.validate_set(&[BASE, SYNONYM_SWAP, DISTINCT]);
        assert!(!report.valid);
        assert_eq!(report.pairs_below_threshold.len(), 1);
        assert_eq!(report.pairs_below_threshold[0].pair, (1, 2));
        assert_eq!(report.threshold, 0.3);

        let m = &report.similarity_matrix;
        assert_eq!(m.len(), 3);
        assert_eq!(m[0][0], 1.0);
        assert_eq!(m[0][1], m[1][0]);
        assert_eq!(m[1][2], m[2][1]);
    }

    #[test]
    fn test_validate_set_statistics() {
        let d = differentiator();
        let report = d.validate_set(&[BASE, DISTINCT]);
        let sim = d.similarity(BASE, DISTINCT);
        assert!(report.valid);
        assert_eq!(report.min_similarity, round_to(sim, 3));
        assert_eq!(report.avg_similarity, round_to(sim, 3));
        assert_eq!(report.min_difference, round_to(1.0 - sim, 3));
    }

    #[test]
    fn test_least_different_pair() {
        let d = differentiator();
        assert_eq!(d.least_different_pair(&[BASE]), None);

        let (i, j, sim) = d.least_different_pair(&[DISTINCT, BASE, SYNONYM_SWAP]).unwrap();
        assert_eq!((i, j), (1, 2));
        assert!(sim > 0.7);
    }

    #[test]
    fn test_least_different_pair_ties_go_to_first() {
        let d = differentiator();
        let (i, j, _) = d.least_different_pair(&[BASE, BASE, BASE]).unwrap();
        assert_eq!((i, j), (0, 1));
    }

    #[test]
    fn test_suggest_regeneration() {
        let d = differentiator();
        assert_eq!(d.suggest_regeneration(&[BASE, DISTINCT]), None);

        let suggestion = d.suggest_regeneration(&[BASE, SYNONYM_SWAP, DISTINCT]);
        assert!(matches!(suggestion, Some(0) | Some(1)));
    }

    #[test]
    fn test_suggest_from_report_picks_most_involved() {
        let pair = |a, b| PairDifference {
            pair: (a, b),
            similarity: 0.9,
            difference: 0.1,
        };
        let report = DifferentiationReport {
            valid: false,
            min_difference: 0.1,
            avg_difference: 0.1,
            min_similarity: 0.9,
            avg_similarity: 0.9,
            pairs_below_threshold: vec![pair(1, 3), pair(2, 3)],
            threshold: 0.3,
            similarity_matrix: Vec::new(),
        };
        assert_eq!(suggest_from_report(&report, 3), Some(2));

        let tied = DifferentiationReport {
            pairs_below_threshold: vec![pair(2, 3)],
            ..report.clone()
        };
        assert_eq!(suggest_from_report(&tied, 3), Some(1));

        let empty = DifferentiationReport {
            pairs_below_threshold: Vec::new(),
            ..report
        };
        assert_eq!(suggest_from_report(&empty, 3), None);
    }

    #[test]
    fn test_format_report() {
        let d = differentiator();
        let ok = format_report(&d.validate_set(&[BASE, DISTINCT]));
        assert!(ok.contains("VARIATION DIFFERENTIATION REPORT"));
        assert!(ok.contains("Required Threshold: 30.0%"));
        assert!(ok.contains("[OK] All variations are sufficiently different!"));

        let failed = format_report(&d.validate_set(&[BASE, SYNONYM_SWAP]));
        assert!(failed.contains("[WARNING] 1 pair(s) below threshold:"));
        assert!(failed.contains("Variation 1 <-> Variation 2:"));
    }

    proptest! {
        #[test]
        fn prop_similarity_is_symmetric(a in "[a-z ]{0,80}", b in "[a-z ]{0,80}") {
            let d = differentiator();
            prop_assert_eq!(d.similarity(&a, &b), d.similarity(&b, &a));
        }

        #[test]
        fn prop_similarity_identity(a in "[a-z]{1,8}( [a-z]{1,8}){0,15}") {
            let d = differentiator();
            prop_assert!((d.similarity(&a, &a) - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_threshold_consistency(
            texts in proptest::collection::vec("[a-z]{2,6}( [a-z]{2,6}){0,10}", 2..5),
            threshold in 0.0f64..1.0,
        ) {
            let d = VariationDifferentiator::new(threshold);
            let report = d.validate_set(&texts);
            for i in 0..texts.len() {
                for j in (i + 1)..texts.len() {
                    let flagged = report.pairs_below_threshold.iter().any(|p| p.pair == (i + 1, j + 1));
                    let below = 1.0 - report.similarity_matrix[i][j] < threshold;
                    prop_assert_eq!(flagged, below);
                }
            }
            prop_assert_eq!(report.valid, report.pairs_below_threshold.is_empty());
        }
    }
}
