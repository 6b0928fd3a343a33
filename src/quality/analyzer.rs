//! Multi-dimensional content quality scoring.
//!
//! The [`QualityAnalyzer`] produces five 0-100 sub-scores (readability, SEO,
//! engagement, template structure, factual consistency) and a weighted
//! overall score. Every metric is a pattern or statistics heuristic, so the
//! same text always scores the same.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use super::profiles::ScoringWeights;
use super::readability::TextCounts;
use super::text::{
    alphabetic_word_regex, alphabetic_words, clamp_score, count_matches, rank_by_frequency,
    round_to, word_count,
};

/// Score reported for a dimension that has nothing to compare against.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Reading complexity bucketed from the Flesch-Kincaid grade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Easy,
    Moderate,
    Challenging,
    Advanced,
    Unknown,
}

impl Complexity {
    /// Buckets a grade level: below 8 easy, below 12 moderate, below 16 challenging.
    pub fn from_grade(grade_level: f64) -> Self {
        if grade_level < 8.0 {
            Complexity::Easy
        } else if grade_level < 12.0 {
            Complexity::Moderate
        } else if grade_level < 16.0 {
            Complexity::Challenging
        } else {
            Complexity::Advanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Easy => "easy",
            Complexity::Moderate => "moderate",
            Complexity::Challenging => "challenging",
            Complexity::Advanced => "advanced",
            Complexity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Readability sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityScore {
    /// Flesch reading ease clamped to 0-100
    pub score: f64,
    /// Unclamped Flesch reading ease
    pub flesch_score: f64,
    /// Flesch-Kincaid grade level
    pub grade_level: f64,
    pub complexity: Complexity,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// SEO sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoScore {
    pub score: f64,
    pub word_count: usize,
    pub headings_count: usize,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    /// Up to five most frequent repeated keywords
    pub keywords: Vec<String>,
    pub has_intro: bool,
    pub has_conclusion: bool,
}

/// Engagement sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementScore {
    pub score: f64,
    pub questions: usize,
    pub personal_pronouns: usize,
    pub examples: usize,
    pub action_verbs: usize,
    pub emotional_words: usize,
    pub lists: usize,
}

/// Template-structure sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureScore {
    pub score: f64,
    /// Percentage of template sections found in the article
    pub template_match: u32,
    pub sections_complete: bool,
    pub template_sections_count: usize,
    pub article_sections_count: usize,
    pub has_proper_h1: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Factual-consistency sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactualScore {
    pub score: f64,
    /// Citation-indicator phrases found in the article
    pub reference_citations: usize,
    pub keyword_overlap: usize,
    /// Shared reference keywords, sorted, at most ten
    pub reference_keywords_found: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Composite quality scores for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    /// Weighted sum of the sub-scores, rounded to one decimal
    pub overall_score: f64,
    pub readability: ReadabilityScore,
    pub seo: SeoScore,
    pub engagement: EngagementScore,
    pub structure: StructureScore,
    pub factual: FactualScore,
}

impl QualityScores {
    /// Weighted sum of the sub-scores under `weights`, rounded to one decimal.
    pub fn weighted_overall(&self, weights: &ScoringWeights) -> f64 {
        let overall = weights.readability * self.readability.score
            + weights.seo * self.seo.score
            + weights.engagement * self.engagement.score
            + weights.structure * self.structure.score
            + weights.factual * self.factual.score;
        round_to(overall, 1)
    }
}

/// Scores content quality across five dimensions.
///
/// Holds only compiled patterns and the scoring weights, so a single instance
/// can be shared across threads and reused for any number of articles.
#[derive(Debug, Clone)]
pub struct QualityAnalyzer {
    weights: ScoringWeights,
    h1: Regex,
    h2: Regex,
    h3: Regex,
    section_heading: Regex,
    keyword_word: Regex,
    reference_word: Regex,
    pronouns: Regex,
    example_markers: Regex,
    action_verbs: Regex,
    emotional_words: Regex,
    bullet_lines: Regex,
    citation_phrases: Regex,
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityAnalyzer {
    /// Creates an analyzer with the default weights.
    ///
    /// # Panics
    /// Panics if a built-in pattern fails to compile, which cannot happen for
    /// the fixed patterns used here.
    pub fn new() -> Self {
        Self::with_weights(ScoringWeights::default())
    }

    /// Creates an analyzer with custom sub-score weights.
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self {
            weights,
            h1: Regex::new(r"(?m)^# [^#]").expect("Invalid regex"),
            h2: Regex::new(r"(?m)^## [^#]").expect("Invalid regex"),
            h3: Regex::new(r"(?m)^### [^#]").expect("Invalid regex"),
            section_heading: Regex::new(r"(?m)^##\s+(.+)$").expect("Invalid regex"),
            keyword_word: alphabetic_word_regex(4),
            reference_word: alphabetic_word_regex(5),
            pronouns: Regex::new(r"(?i)\b(you|your|we|our|I|my)\b").expect("Invalid regex"),
            example_markers: Regex::new(r"(?i)\b(example|for instance|such as|like|imagine)\b")
                .expect("Invalid regex"),
            action_verbs: Regex::new(
                r"(?i)\b(discover|learn|explore|achieve|create|build|transform)\b",
            )
            .expect("Invalid regex"),
            emotional_words: Regex::new(
                r"(?i)\b(amazing|powerful|essential|critical|important|significant|incredible)\b",
            )
            .expect("Invalid regex"),
            bullet_lines: Regex::new(r"(?m)^\s*[-*+]\s").expect("Invalid regex"),
            citation_phrases: Regex::new(
                r"(?i)(according to|research shows|studies indicate|data suggests|source:|cited)",
            )
            .expect("Invalid regex"),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Scores `content` on every dimension.
    ///
    /// A missing or empty `template` gives a neutral structure score, and a
    /// missing or empty `reference` gives a neutral factual score.
    pub fn analyze(
        &self,
        content: &str,
        template: Option<&str>,
        reference: Option<&str>,
    ) -> QualityScores {
        let mut scores = QualityScores {
            overall_score: 0.0,
            readability: self.readability(content),
            seo: self.seo(content),
            engagement: self.engagement(content),
            structure: self.structure(content, template),
            factual: self.factual(content, reference),
        };
        scores.overall_score = scores.weighted_overall(&self.weights);

        debug!(
            overall = scores.overall_score,
            readability = scores.readability.score,
            seo = scores.seo.score,
            engagement = scores.engagement.score,
            structure = scores.structure.score,
            factual = scores.factual.score,
            "content scored"
        );
        scores
    }

    /// Readability from Flesch reading ease and Flesch-Kincaid grade.
    pub fn readability(&self, text: &str) -> ReadabilityScore {
        let Some(counts) = TextCounts::from_text(text) else {
            return ReadabilityScore {
                score: NEUTRAL_SCORE,
                flesch_score: 0.0,
                grade_level: 0.0,
                complexity: Complexity::Unknown,
                avg_word_length: 0.0,
                avg_sentence_length: 0.0,
                note: Some("Readability could not be computed for text without words".to_string()),
            };
        };

        let flesch = counts.flesch_reading_ease();
        let grade = counts.flesch_kincaid_grade();

        let words: Vec<&str> = text.split_whitespace().collect();
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let avg_word_length = total_chars as f64 / words.len().max(1) as f64;
        // naive period split, matching how editors eyeball sentence length
        let period_fragments = text.split('.').count();
        let avg_sentence_length = words.len() as f64 / period_fragments.max(1) as f64;

        ReadabilityScore {
            score: round_to(clamp_score(flesch), 1),
            flesch_score: round_to(flesch, 1),
            grade_level: round_to(grade, 1),
            complexity: Complexity::from_grade(grade),
            avg_word_length: round_to(avg_word_length, 1),
            avg_sentence_length: round_to(avg_sentence_length, 1),
            note: None,
        }
    }

    /// Heading structure, length, keyword repetition and intro/conclusion markers.
    pub fn seo(&self, text: &str) -> SeoScore {
        let h1_count = count_matches(&self.h1, text);
        let h2_count = count_matches(&self.h2, text);
        let h3_count = count_matches(&self.h3, text);
        let headings_count = h1_count + h2_count + h3_count;

        let lowercase = text.to_lowercase();
        let keywords: Vec<String> =
            rank_by_frequency(alphabetic_words(&self.keyword_word, &lowercase))
                .into_iter()
                .take(10)
                .filter(|(_, count)| *count >= 2)
                .map(|(word, _)| word)
                .collect();

        let words = word_count(text);

        let mut score = 0.0;
        if h1_count == 1 {
            score += 15.0;
        }
        if h2_count >= 3 {
            score += 10.0;
        }
        if headings_count >= 5 {
            score += 5.0;
        }

        score += match words {
            800..=2500 => 30.0,
            500..=799 | 2501..=3500 => 20.0,
            300.. => 10.0,
            _ => 0.0,
        };

        score += (keywords.len() as f64 * 2.0).min(20.0);

        let has_intro = ["introduction", "overview"]
            .iter()
            .any(|marker| lowercase.contains(marker));
        let has_conclusion = ["conclusion", "summary", "takeaway"]
            .iter()
            .any(|marker| lowercase.contains(marker));
        if has_intro {
            score += 10.0;
        }
        if has_conclusion {
            score += 10.0;
        }

        SeoScore {
            score: score.min(100.0),
            word_count: words,
            headings_count,
            h1_count,
            h2_count,
            h3_count,
            keywords: keywords.into_iter().take(5).collect(),
            has_intro,
            has_conclusion,
        }
    }

    /// Questions, direct address, examples, action and power words, bullet lists.
    pub fn engagement(&self, text: &str) -> EngagementScore {
        let questions = text.matches('?').count();
        let personal_pronouns = count_matches(&self.pronouns, text);
        let examples = count_matches(&self.example_markers, text);
        let action_verbs = count_matches(&self.action_verbs, text);
        let emotional_words = count_matches(&self.emotional_words, text);
        let lists = count_matches(&self.bullet_lines, text);

        let score = (questions as f64 * 5.0).min(15.0)
            + (personal_pronouns as f64 * 0.5).min(20.0)
            + (examples as f64 * 3.0).min(20.0)
            + (action_verbs as f64 * 2.0).min(15.0)
            + (emotional_words as f64 * 2.0).min(15.0)
            + (lists as f64).min(15.0);

        EngagementScore {
            score: round_to(score, 0).min(100.0),
            questions,
            personal_pronouns,
            examples,
            action_verbs,
            emotional_words,
            lists,
        }
    }

    /// Adherence to the `##` sections of a template.
    pub fn structure(&self, text: &str, template: Option<&str>) -> StructureScore {
        let Some(template) = template.filter(|t| !t.is_empty()) else {
            return StructureScore {
                score: NEUTRAL_SCORE,
                template_match: 0,
                sections_complete: false,
                template_sections_count: 0,
                article_sections_count: 0,
                has_proper_h1: false,
                note: Some("No template provided for comparison".to_string()),
            };
        };

        let template_sections = self.section_headings(template);
        let article_sections = self.section_headings(text);

        let (template_match, sections_complete) = if template_sections.is_empty() {
            (100, true)
        } else {
            let matched = template_sections
                .iter()
                .filter(|section| {
                    article_sections
                        .iter()
                        .any(|candidate| headings_match(section, candidate))
                })
                .count();
            let percent = round_to(matched as f64 / template_sections.len() as f64 * 100.0, 0);
            (percent as u32, matched == template_sections.len())
        };

        let has_proper_h1 = count_matches(&self.h1, text) == 1;

        let score = f64::from(template_match) * 0.6
            + if sections_complete { 20.0 } else { 10.0 }
            + if has_proper_h1 { 20.0 } else { 0.0 };

        StructureScore {
            score: round_to(score, 0).min(100.0),
            template_match,
            sections_complete,
            template_sections_count: template_sections.len(),
            article_sections_count: article_sections.len(),
            has_proper_h1,
            note: None,
        }
    }

    /// Citation phrasing and keyword overlap with the reference material.
    pub fn factual(&self, text: &str, reference: Option<&str>) -> FactualScore {
        let Some(reference) = reference.filter(|r| !r.is_empty()) else {
            return FactualScore {
                score: NEUTRAL_SCORE,
                reference_citations: 0,
                keyword_overlap: 0,
                reference_keywords_found: Vec::new(),
                note: Some("No references provided for comparison".to_string()),
            };
        };

        let reference_citations = count_matches(&self.citation_phrases, text);

        let reference_lower = reference.to_lowercase();
        let reference_keywords: BTreeSet<String> =
            rank_by_frequency(alphabetic_words(&self.reference_word, &reference_lower))
                .into_iter()
                .take(20)
                .filter(|(_, count)| *count >= 2)
                .map(|(word, _)| word)
                .collect();

        let text_lower = text.to_lowercase();
        let article_words: BTreeSet<&str> = alphabetic_words(&self.reference_word, &text_lower)
            .into_iter()
            .collect();

        // BTreeSet iteration is already sorted
        let shared: Vec<String> = reference_keywords
            .iter()
            .filter(|word| article_words.contains(word.as_str()))
            .cloned()
            .collect();
        let keyword_overlap = shared.len();

        let score = (reference_citations as f64 * 10.0).min(40.0)
            + (keyword_overlap as f64 * 3.0).min(60.0);

        FactualScore {
            score: score.min(100.0),
            reference_citations,
            keyword_overlap,
            reference_keywords_found: shared.into_iter().take(10).collect(),
            note: None,
        }
    }

    fn section_headings<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.section_heading
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }
}

/// Fuzzy heading match: any shared word, or the template heading contained
/// in the article heading, both case-insensitive.
fn headings_match(template_heading: &str, article_heading: &str) -> bool {
    let template_lower = template_heading.to_lowercase();
    let article_lower = article_heading.to_lowercase();

    let article_words: BTreeSet<&str> = article_lower.split_whitespace().collect();
    template_lower
        .split_whitespace()
        .any(|word| article_words.contains(word))
        || article_lower.contains(&template_lower)
}

/// Renders scores as a multi-line report for console display.
pub fn format_summary(scores: &QualityScores) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("\n{rule}\nQUALITY ANALYSIS REPORT\n{rule}\n\n"));
    out.push_str(&format!("Overall Score: {}/100\n\n", scores.overall_score));

    let r = &scores.readability;
    out.push_str(&format!("[READABILITY] Readability: {}/100\n", r.score));
    out.push_str(&format!("   Grade Level: {}\n", r.grade_level));
    out.push_str(&format!("   Complexity: {}\n\n", r.complexity));

    let s = &scores.seo;
    out.push_str(&format!("[SEO] SEO: {}/100\n", s.score));
    out.push_str(&format!("   Word Count: {}\n", s.word_count));
    out.push_str(&format!("   Headings: {}\n\n", s.headings_count));

    let e = &scores.engagement;
    out.push_str(&format!("[ENGAGEMENT] Engagement: {}/100\n", e.score));
    out.push_str(&format!("   Questions: {}\n", e.questions));
    out.push_str(&format!("   Examples: {}\n\n", e.examples));

    let st = &scores.structure;
    out.push_str(&format!("[STRUCTURE] Structure: {}/100\n", st.score));
    match &st.note {
        Some(note) => out.push_str(&format!("   {note}\n\n")),
        None => out.push_str(&format!("   Template Match: {}%\n\n", st.template_match)),
    }

    let f = &scores.factual;
    out.push_str(&format!("[FACTUAL] Factual Consistency: {}/100\n", f.score));
    out.push_str(&format!("   Citations: {}\n", f.reference_citations));

    out.push_str(&format!("\n{rule}\n"));
    out
}
