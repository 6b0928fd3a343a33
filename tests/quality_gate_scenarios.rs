//! End-to-end scenarios across the citation validator, analyzer,
//! differentiator and the draft gates.

use std::path::PathBuf;

use quillgate::quality::{
    CitationValidator, DraftGateChecker, DraftInput, GateConfig, Issue, QualityAnalyzer,
    VariationDifferentiator, Warning,
};

const MIQUIDO_URL: &str = "https://www.miquido.com/blog/ui-ux-design-trends/";

fn reference() -> String {
    format!(
        "Research notes\n\n\
         - [Miquido UI/UX Trends]({MIQUIDO_URL})\n\
         - Raw link: https://www.nngroup.com/articles/response-times-3-important-limits/\n"
    )
}

fn fixture_config() -> GateConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/quillgate.toml");
    GateConfig::load(path).expect("fixture config should load")
}

#[test]
fn linked_citation_from_reference_passes() {
    let content = format!("According to [Miquido UI/UX Trends]({MIQUIDO_URL}), speed matters.");
    let report = CitationValidator::new().validate(&content, &reference());

    assert!(report.passed);
    assert_eq!(report.total_citations, 1);
    assert_eq!(report.valid_citations, 1);
    assert_eq!(report.hallucinated_count, 0);
    assert_eq!(report.reference_url_count, 2);
}

#[test]
fn unlinked_attribution_is_reported() {
    let content = "According to Miquido UI/UX Trends, speed matters.";
    let report = CitationValidator::new().validate(content, &reference());

    assert!(!report.passed);
    assert!(report.issues.iter().any(|issue| matches!(
        issue,
        Issue::MissingHyperlink { source, .. } if source.contains("Miquido UI/UX Trends")
    )));
}

#[test]
fn invented_url_is_hallucinated() {
    let content = "Studies show [a big jump](https://invented-url.com/article) in sales.";
    let report = CitationValidator::new().validate(content, &reference());

    assert!(!report.passed);
    assert_eq!(report.hallucinated_count, 1);
    let hallucinated: Vec<&str> = report
        .issues
        .iter()
        .filter_map(|issue| match issue {
            Issue::HallucinatedUrl { url, .. } => Some(url.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(hallucinated, vec!["https://invented-url.com/article"]);
}

#[test]
fn empty_reference_warns_and_flags_every_link() {
    let content = format!("See [Miquido]({MIQUIDO_URL}).");
    let report = CitationValidator::new().validate(&content, "");

    assert!(!report.passed);
    assert_eq!(report.warnings, vec![Warning::NoReferences]);
    assert_eq!(report.hallucinated_count, 1);
}

#[test]
fn near_duplicate_variations_are_flagged() {
    let base = "Fast mobile pages keep shoppers engaged. Teams that trim heavy scripts see \
                checkout conversion climb steadily, while slow product listings quietly drive \
                visitors toward competitors.";
    let swapped = base.replace("climb", "rise");
    let distinct = "Imagine a gardener pruning roses at dawn: patient cuts, careful watering, \
                    and compost turned weekly produce blooms that neighbours admire all summer.";
    let variations = vec![base.to_string(), swapped, distinct.to_string()];

    let differentiator = VariationDifferentiator::new(0.3);
    let report = differentiator.validate_set(&variations);

    assert!(!report.valid);
    assert_eq!(report.pairs_below_threshold.len(), 1);
    assert_eq!(report.pairs_below_threshold[0].pair, (1, 2));
    assert_eq!(report.similarity_matrix.len(), 3);

    let suggestion = differentiator.suggest_regeneration(&variations);
    assert!(matches!(suggestion, Some(0) | Some(1)));
}

fn long_article() -> String {
    let sentence = "Performance budgets help product teams protect mobile checkout conversion rates. ";
    let paragraph = sentence.repeat(24);
    format!(
        "# Why Page Speed Decides Conversions\n\n\
         ## Introduction\n\n{paragraph}\n\n\
         ## Measuring Load Time\n\n{paragraph}\n\n\
         ## Fixing Slow Pages\n\n{paragraph}\n\n\
         ## Conclusion\n\n{paragraph}\n"
    )
}

#[test]
fn well_structured_long_article_scores_high_on_seo() {
    let article = long_article();
    let seo = QualityAnalyzer::new().seo(&article);

    assert!((800..=2500).contains(&seo.word_count), "{}", seo.word_count);
    assert_eq!(seo.h1_count, 1);
    assert_eq!(seo.h2_count, 4);
    assert!(seo.has_intro);
    assert!(seo.has_conclusion);
    assert!(seo.score >= 85.0, "seo score {}", seo.score);
    assert!(seo.score <= 100.0);
}

#[test]
fn fixture_config_matches_defaults() {
    let config = fixture_config();
    assert_eq!(config, GateConfig::default());
    assert_eq!(config.scoring.min_overall_score, 60.0);
    assert_eq!(config.differentiation.min_difference, 0.3);
    assert_eq!(config.generation.variation_count, 3);
}

#[test]
fn draft_gates_report_each_failure_independently() {
    let mut config = fixture_config();
    config.scoring.min_overall_score = 0.0;
    let checker = DraftGateChecker::new(&config);

    let draft = DraftInput::new(format!(
        "{}\nAccording to Miquido UI/UX Trends, speed matters.",
        long_article()
    ))
    .with_reference(reference());

    let mut updates = Vec::new();
    let results = checker.run_all_gates_with_progress(&draft, |update| updates.push(update));

    assert_eq!(results.len(), 2);
    assert!(!results[0].passed, "citation gate should fail");
    assert!(results[1].passed, "quality gate should pass with a zero minimum");
    assert!(!DraftGateChecker::all_passed(&results));
    assert_eq!(updates.len(), 4);
    assert!(updates.iter().filter(|u| u.is_completed()).count() == 2);
}

#[test]
fn analysis_is_deterministic() {
    let article = long_article();
    let analyzer = QualityAnalyzer::new();
    let first = analyzer.analyze(&article, Some("## Introduction\n## Conclusion"), Some(&reference()));
    let second = analyzer.analyze(&article, Some("## Introduction\n## Conclusion"), Some(&reference()));
    assert_eq!(first, second);
    assert!((0.0..=100.0).contains(&first.overall_score));
}
