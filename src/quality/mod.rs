//! Content quality gates.
//!
//! Three independent checks run between pipeline stages:
//!
//! - [`citations`]: every inline link must come from the reference material,
//!   and attributed claims must carry a link.
//! - [`analyzer`]: five weighted 0-100 scores (readability, SEO, engagement,
//!   structure, factual grounding) combined into an overall score.
//! - [`differentiation`]: pairwise TF-IDF similarity across a set of
//!   variations, with a threshold and a regeneration suggestion.
//!
//! [`gates`] wraps the first two as pass/fail gates for a single draft.

pub mod analyzer;
pub mod citations;
pub mod differentiation;
pub mod gates;
pub mod profiles;
pub mod readability;
pub mod text;
pub mod tfidf;

pub use analyzer::{
    Complexity, EngagementScore, FactualScore, QualityAnalyzer, QualityScores, ReadabilityScore,
    SeoScore, StructureScore,
};
pub use citations::{
    Citation, CitationValidator, Issue, ReferenceCorpus, UnlinkedMention, ValidationReport,
    Warning,
};
pub use differentiation::{DifferentiationReport, PairDifference, VariationDifferentiator};
pub use gates::{DraftGateChecker, DraftInput, GateProgressState, GateProgressUpdate, GateResult};
pub use profiles::{
    DifferentiationConfig, GateConfig, GenerationConfig, QualityConfigError, ScoringConfig,
    ScoringWeights,
};
