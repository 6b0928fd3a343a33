//! Citation validation for generated articles.
//!
//! Checks that every hyperlinked citation points at a URL that exists in the
//! supplied reference material, and flags attribution phrases ("according to
//! X Research", "[Source: X]", ...) that were written without a hyperlink.
//! Validation is purely textual: URLs are never fetched.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::text::truncate_chars;

/// Matches a markdown hyperlink `[label](url)`.
const MARKDOWN_LINK_PATTERN: &str = r"\[([^\]]+)\]\(([^\)]+)\)";

/// Matches a bare absolute http(s) URL.
const BARE_URL_PATTERN: &str = r"https?://[^\s\)]+";

/// Maximum characters of the source line kept as context for an unlinked mention.
const CONTEXT_SNIPPET_CHARS: usize = 100;

/// The set of URLs that citations are allowed to point at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCorpus {
    urls: BTreeSet<String>,
}

impl ReferenceCorpus {
    /// Creates a corpus from an explicit list of URLs.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// Extracts the corpus from reference material with the default validator.
    pub fn from_text(reference_text: &str) -> Self {
        CitationValidator::new().extract_reference_urls(reference_text)
    }

    /// Returns true if `url` is part of the corpus.
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of distinct URLs in the corpus.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true if the corpus holds no URLs.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Iterates URLs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

/// A hyperlinked citation found in generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// The link label
    pub text: String,
    /// The link target as written
    pub url: String,
    /// 1-based line number
    pub line_number: usize,
}

/// An attribution phrase that is not backed by a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlinkedMention {
    /// The attributed source, e.g. "Gartner Research"
    pub source_name: String,
    /// 1-based line number
    pub line_number: usize,
    /// Start of the trimmed source line
    pub context_snippet: String,
}

/// A problem that fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Issue {
    /// A link whose URL is absent from the reference corpus.
    HallucinatedUrl {
        line: usize,
        url: String,
        text: String,
    },
    /// An attribution phrase without a hyperlink.
    MissingHyperlink { line: usize, source: String },
}

impl Issue {
    /// Snake-case identifier of the issue kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Issue::HallucinatedUrl { .. } => "hallucinated_url",
            Issue::MissingHyperlink { .. } => "missing_hyperlink",
        }
    }

    /// 1-based line the issue was found on.
    pub fn line(&self) -> usize {
        match self {
            Issue::HallucinatedUrl { line, .. } | Issue::MissingHyperlink { line, .. } => *line,
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        match self {
            Issue::HallucinatedUrl { url, .. } => format!("URL not found in references: {url}"),
            Issue::MissingHyperlink { source, .. } => {
                format!("Citation lacks hyperlink: '{source}'")
            }
        }
    }
}

/// A non-fatal observation about the validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// The reference material contained no URLs, so every absolute link is unverifiable.
    NoReferences,
}

impl Warning {
    /// Human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            Warning::NoReferences => "No URLs found in reference material",
        }
    }
}

/// Outcome of validating one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff `issues` is empty
    pub passed: bool,
    pub total_citations: usize,
    pub valid_citations: usize,
    pub hallucinated_count: usize,
    pub unlinked_count: usize,
    pub issues: Vec<Issue>,
    pub warnings: Vec<Warning>,
    pub reference_url_count: usize,
}

/// Extra rejection rule applied after an attribution regex matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionGuard {
    /// Only the shared link-label check applies.
    None,
    /// Reject when the match is immediately followed by `(`.
    NotFollowedByParen,
    /// Reject when the captured source contains an http token.
    NoUrlInSource,
}

/// A regex that recognises an attribution phrase; group 1 captures the source name.
#[derive(Debug, Clone)]
pub struct AttributionPattern {
    regex: Regex,
    guard: MentionGuard,
    description: String,
}

impl AttributionPattern {
    /// Creates a new attribution pattern.
    ///
    /// # Panics
    /// Panics if the regex pattern is invalid or has no capture group.
    pub fn new(pattern: &str, guard: MentionGuard, description: impl Into<String>) -> Self {
        let regex = Regex::new(pattern).expect("Invalid attribution pattern");
        assert!(
            regex.captures_len() > 1,
            "attribution pattern needs a source capture group"
        );
        Self {
            regex,
            guard,
            description: description.into(),
        }
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the guard.
    pub fn guard(&self) -> MentionGuard {
        self.guard
    }

    /// Finds unlinked mentions of this pattern within one line.
    ///
    /// `label_ends` holds every byte offset in `line` where a `](` sequence
    /// starts; a match ending at one of those offsets is the label of a link.
    fn scan_line(&self, line: &str, label_ends: &BTreeSet<usize>) -> Vec<String> {
        let mut sources = Vec::new();
        for caps in self.regex.captures_iter(line) {
            let (Some(whole), Some(source)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if label_ends.contains(&whole.end()) {
                continue;
            }
            let rejected = match self.guard {
                MentionGuard::None => false,
                MentionGuard::NotFollowedByParen => line[whole.end()..].starts_with('('),
                MentionGuard::NoUrlInSource => source.as_str().contains("http"),
            };
            if !rejected {
                sources.push(source.as_str().trim().to_string());
            }
        }
        sources
    }
}

/// Validates citations in generated content against a reference corpus.
#[derive(Debug, Clone)]
pub struct CitationValidator {
    link_regex: Regex,
    bare_url_regex: Regex,
    patterns: Vec<AttributionPattern>,
}

impl Default for CitationValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationValidator {
    /// Creates a validator with the default attribution patterns.
    pub fn new() -> Self {
        Self::with_patterns(Self::default_patterns())
    }

    /// Creates a validator with custom attribution patterns.
    pub fn with_patterns(patterns: Vec<AttributionPattern>) -> Self {
        Self {
            link_regex: Regex::new(MARKDOWN_LINK_PATTERN).expect("Invalid link regex"),
            bare_url_regex: Regex::new(BARE_URL_PATTERN).expect("Invalid URL regex"),
            patterns,
        }
    }

    /// The attribution phrases checked for a missing hyperlink, in scan order.
    fn default_patterns() -> Vec<AttributionPattern> {
        vec![
            AttributionPattern::new(
                r"\b[Aa]ccording to ([A-Z][A-Za-z0-9\s&/]+(?:Study|Research|Report|Trends|Analysis|Team|Survey|Data))",
                MentionGuard::None,
                "according to <source>",
            ),
            AttributionPattern::new(
                r"\b[Aa]s (?:highlighted|noted|reported|shown) by ([A-Z][A-Za-z0-9\s&/]+)",
                MentionGuard::None,
                "as noted by <source>",
            ),
            AttributionPattern::new(
                r"\[Source: ([^\]]+)\]",
                MentionGuard::NotFollowedByParen,
                "[Source: <source>]",
            ),
            AttributionPattern::new(
                r"- Source: (.+)",
                MentionGuard::NoUrlInSource,
                "- Source: <source>",
            ),
            AttributionPattern::new(
                r"\b[Pp]er ([A-Z][A-Za-z0-9\s]+(?:Study|Research|Report|Trends))",
                MentionGuard::None,
                "per <source>",
            ),
        ]
    }

    /// Returns the configured attribution patterns.
    pub fn patterns(&self) -> &[AttributionPattern] {
        &self.patterns
    }

    /// Collects every URL mentioned in the reference material.
    ///
    /// Both markdown link targets and bare http(s) URLs count. Empty text
    /// yields an empty corpus.
    pub fn extract_reference_urls(&self, reference_text: &str) -> ReferenceCorpus {
        let mut urls = BTreeSet::new();
        for caps in self.link_regex.captures_iter(reference_text) {
            if let Some(url) = caps.get(2) {
                urls.insert(url.as_str().to_string());
            }
        }
        for m in self.bare_url_regex.find_iter(reference_text) {
            urls.insert(m.as_str().to_string());
        }
        ReferenceCorpus { urls }
    }

    /// Extracts every markdown hyperlink from `content`, in document order.
    pub fn extract_citations(&self, content: &str) -> Vec<Citation> {
        let mut citations = Vec::new();
        for (idx, line) in content.split('\n').enumerate() {
            for caps in self.link_regex.captures_iter(line) {
                if let (Some(text), Some(url)) = (caps.get(1), caps.get(2)) {
                    citations.push(Citation {
                        text: text.as_str().to_string(),
                        url: url.as_str().to_string(),
                        line_number: idx + 1,
                    });
                }
            }
        }
        citations
    }

    /// Finds attribution phrases that are not the label of a markdown link.
    pub fn find_unlinked_mentions(&self, content: &str) -> Vec<UnlinkedMention> {
        let mut mentions = Vec::new();
        for (idx, line) in content.split('\n').enumerate() {
            let label_ends: BTreeSet<usize> = line.match_indices("](").map(|(i, _)| i).collect();

            for pattern in &self.patterns {
                for source_name in pattern.scan_line(line, &label_ends) {
                    mentions.push(UnlinkedMention {
                        source_name,
                        line_number: idx + 1,
                        context_snippet: truncate_chars(line.trim(), CONTEXT_SNIPPET_CHARS),
                    });
                }
            }
        }
        mentions
    }

    /// Validates `content` against the URLs found in `reference_text`.
    pub fn validate(&self, content: &str, reference_text: &str) -> ValidationReport {
        let corpus = self.extract_reference_urls(reference_text);
        self.validate_against(content, &corpus)
    }

    /// Validates `content` against an already extracted corpus.
    pub fn validate_against(&self, content: &str, corpus: &ReferenceCorpus) -> ValidationReport {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if corpus.is_empty() {
            warn!("reference corpus is empty; absolute links cannot be verified");
            warnings.push(Warning::NoReferences);
        }

        let citations = self.extract_citations(content);
        let mut valid_citations = 0;
        let mut hallucinated_count = 0;

        for citation in &citations {
            let url = citation.url.trim();
            if url.starts_with('#') || !url.starts_with("http") {
                continue;
            }
            if corpus.contains(url) {
                valid_citations += 1;
            } else {
                hallucinated_count += 1;
                issues.push(Issue::HallucinatedUrl {
                    line: citation.line_number,
                    url: url.to_string(),
                    text: citation.text.clone(),
                });
            }
        }

        let unlinked = self.find_unlinked_mentions(content);
        for mention in &unlinked {
            issues.push(Issue::MissingHyperlink {
                line: mention.line_number,
                source: mention.source_name.clone(),
            });
        }

        debug!(
            total_citations = citations.len(),
            valid_citations,
            hallucinated_count,
            unlinked_count = unlinked.len(),
            reference_urls = corpus.len(),
            "citation validation finished"
        );

        ValidationReport {
            passed: issues.is_empty(),
            total_citations: citations.len(),
            valid_citations,
            hallucinated_count,
            unlinked_count: unlinked.len(),
            issues,
            warnings,
            reference_url_count: corpus.len(),
        }
    }

    /// Validates and renders the report in one call.
    pub fn validate_and_report(&self, content: &str, reference_text: &str) -> (bool, String) {
        let report = self.validate(content, reference_text);
        (report.passed, format_report(&report))
    }
}

/// Renders a validation report for console display.
pub fn format_report(report: &ValidationReport) -> String {
    let rule = "=".repeat(70);
    let mut lines = vec![
        rule.clone(),
        "CITATION VALIDATION REPORT".to_string(),
        rule.clone(),
        String::new(),
        format!(
            "Status: {}",
            if report.passed { "[PASSED]" } else { "[FAILED]" }
        ),
        String::new(),
        format!("Total citations found: {}", report.total_citations),
        format!("Valid citations: {}", report.valid_citations),
        format!("Hallucinated URLs: {}", report.hallucinated_count),
        format!("Unlinked citations: {}", report.unlinked_count),
        format!("Reference URLs available: {}", report.reference_url_count),
        String::new(),
    ];

    if report.issues.is_empty() {
        lines.push("[OK] No issues found - all citations properly hyperlinked!".to_string());
    } else {
        lines.push("ISSUES FOUND:".to_string());
        lines.push("-".repeat(70));
        for (i, issue) in report.issues.iter().enumerate() {
            lines.push(format!("\n{}. {}", i + 1, issue.kind().to_uppercase()));
            lines.push(format!("   Line: {}", issue.line()));
            lines.push(format!("   {}", issue.message()));
            match issue {
                Issue::HallucinatedUrl { url, .. } => {
                    lines.push(format!("   Problematic URL: {url}"));
                }
                Issue::MissingHyperlink { source, .. } => {
                    lines.push(format!("   Source: {source}"));
                }
            }
        }
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("WARNINGS:".to_string());
        lines.push("-".repeat(70));
        for warning in &report.warnings {
            lines.push(format!("[WARNING] {}", warning.message()));
        }
    }

    lines.push(String::new());
    lines.push(rule);
    lines.join("\n")
}
