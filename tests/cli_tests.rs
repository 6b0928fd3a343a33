//! CLI integration tests for the quillgate binary
//!
//! These run the compiled binary against files in a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MIQUIDO_URL: &str = "https://www.miquido.com/blog/ui-ux-design-trends/";

/// Get a Command instance for the quillgate binary
#[allow(deprecated)]
fn quillgate_cmd() -> Command {
    let mut cmd = Command::cargo_bin("quillgate").expect("Failed to find quillgate binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn reference_file(dir: &Path) -> PathBuf {
    write(dir, "reference.md", &format!("- [Miquido UI/UX Trends]({MIQUIDO_URL})\n"))
}

// ============================================================================
// help and version
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    quillgate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("citations"))
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("differentiate"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_version_flag() {
    quillgate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    quillgate_cmd().assert().code(2);
}

// ============================================================================
// citations
// ============================================================================

#[test]
fn test_citations_pass() {
    let dir = TempDir::new().unwrap();
    let article = write(
        dir.path(),
        "article.md",
        &format!("According to [Miquido UI/UX Trends]({MIQUIDO_URL}), speed matters."),
    );
    let reference = reference_file(dir.path());

    quillgate_cmd()
        .arg("citations")
        .arg(&article)
        .arg("--reference")
        .arg(&reference)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[PASSED]"));
}

#[test]
fn test_citations_unlinked_mention_fails() {
    let dir = TempDir::new().unwrap();
    let article = write(
        dir.path(),
        "article.md",
        "According to Miquido UI/UX Trends, speed matters.",
    );
    let reference = reference_file(dir.path());

    quillgate_cmd()
        .args(["citations", "--reference"])
        .arg(&reference)
        .arg(&article)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAILED]"))
        .stdout(predicate::str::contains("MISSING_HYPERLINK"));
}

#[test]
fn test_citations_json_output() {
    let dir = TempDir::new().unwrap();
    let article = write(
        dir.path(),
        "article.md",
        "See [this](https://invented-url.com/article).",
    );
    let reference = reference_file(dir.path());

    let output = quillgate_cmd()
        .args(["--format", "json", "citations"])
        .arg(&article)
        .arg("-r")
        .arg(&reference)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], false);
    assert_eq!(report["hallucinated_count"], 1);
    assert_eq!(report["issues"][0]["type"], "hallucinated_url");
    assert_eq!(report["issues"][0]["url"], "https://invented-url.com/article");
}

#[test]
fn test_missing_reference_file_is_empty_corpus() {
    let dir = TempDir::new().unwrap();
    let article = write(dir.path(), "article.md", "Plain text with no links at all.");

    quillgate_cmd()
        .arg("citations")
        .arg(&article)
        .arg("--reference")
        .arg(dir.path().join("missing.md"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No URLs found in reference material"))
        .stderr(predicate::str::contains("reference file not found"));
}

#[test]
fn test_missing_content_file_is_usage_error() {
    let dir = TempDir::new().unwrap();

    quillgate_cmd()
        .arg("citations")
        .arg(dir.path().join("nope.md"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read"));
}

// ============================================================================
// score
// ============================================================================

#[test]
fn test_score_json_has_all_dimensions() {
    let dir = TempDir::new().unwrap();
    let article = write(
        dir.path(),
        "article.md",
        "# Title\n\n## Introduction\n\nYou can build faster pages. For example, trim scripts.\n\n## Conclusion\n\nDone.",
    );

    let output = quillgate_cmd()
        .args(["score", "-f", "json"])
        .arg(&article)
        .output()
        .unwrap();

    let scores: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for key in ["readability", "seo", "engagement", "structure", "factual"] {
        let score = scores[key]["score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score), "{key} = {score}");
    }
    assert!(scores["overall_score"].as_f64().is_some());
}

#[test]
fn test_score_text_uses_config_threshold() {
    let dir = TempDir::new().unwrap();
    let article = write(dir.path(), "article.md", "Short text. Nothing more.");
    let config = write(
        dir.path(),
        "quillgate.toml",
        "[scoring]\nmin_overall_score = 0.0\n",
    );

    quillgate_cmd()
        .arg("--config")
        .arg(&config)
        .arg("score")
        .arg(&article)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Quality Scores"))
        .stdout(predicate::str::contains("Overall"));
}

#[test]
fn test_invalid_config_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let article = write(dir.path(), "article.md", "Some text.");
    let config = write(
        dir.path(),
        "quillgate.toml",
        "[scoring.weights]\nreadability = 0.9\n",
    );

    quillgate_cmd()
        .arg("--config")
        .arg(&config)
        .arg("score")
        .arg(&article)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid configuration"));
}

// ============================================================================
// differentiate
// ============================================================================

#[test]
fn test_differentiate_flags_near_duplicates() {
    let dir = TempDir::new().unwrap();
    let base = "Fast mobile pages keep shoppers engaged. Teams that trim heavy scripts see \
                checkout conversion climb steadily.";
    let one = write(dir.path(), "v1.md", base);
    let two = write(dir.path(), "v2.md", &base.replace("climb", "rise"));
    let three = write(
        dir.path(),
        "v3.md",
        "Gardeners prune roses at dawn and compost turned weekly feeds the blooms.",
    );

    quillgate_cmd()
        .arg("differentiate")
        .args([&one, &two, &three])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("#1 <-> #2"))
        .stdout(predicate::str::contains("1 pair(s) too similar"));
}

#[test]
fn test_differentiate_distinct_texts_pass_as_json() {
    let dir = TempDir::new().unwrap();
    let one = write(dir.path(), "v1.md", "Sailors chart tides carefully before departure.");
    let two = write(dir.path(), "v2.md", "Climbers acclimatise slowly near base camp.");

    let output = quillgate_cmd()
        .args(["differentiate", "--format", "json"])
        .args([&one, &two])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["similarity_matrix"].as_array().unwrap().len(), 2);
}

#[test]
fn test_differentiate_rejects_threshold_out_of_range() {
    let dir = TempDir::new().unwrap();
    let one = write(dir.path(), "v1.md", "one text");

    quillgate_cmd()
        .args(["differentiate", "--min-difference", "1.5"])
        .arg(&one)
        .assert()
        .code(2);
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_reports_both_gates() {
    let dir = TempDir::new().unwrap();
    let article = write(
        dir.path(),
        "article.md",
        &format!("# Title\n\nAccording to [Miquido UI/UX Trends]({MIQUIDO_URL}), speed matters."),
    );
    let reference = reference_file(dir.path());

    let output = quillgate_cmd()
        .args(["check", "--format", "json", "--reference"])
        .arg(&reference)
        .arg(&article)
        .output()
        .unwrap();

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let gates = result["gates"].as_array().unwrap();
    assert_eq!(gates.len(), 2);
    assert_eq!(gates[0]["gate_name"], "citations");
    assert_eq!(gates[0]["passed"], true);
    assert_eq!(gates[1]["gate_name"], "quality");

    let passed = result["passed"].as_bool().unwrap();
    assert_eq!(output.status.code(), Some(if passed { 0 } else { 1 }));
}

#[test]
fn test_check_text_panel() {
    let dir = TempDir::new().unwrap();
    let article = write(
        dir.path(),
        "article.md",
        "According to Miquido UI/UX Trends, speed matters.",
    );

    quillgate_cmd()
        .arg("check")
        .arg(&article)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Quality Gates"))
        .stdout(predicate::str::contains("Failed: citations"));
}
