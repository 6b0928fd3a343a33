//! Text statistics primitives shared by the quality gates.
//!
//! Everything here is tokenization-free: words are whitespace-separated runs,
//! keyword candidates come from simple ASCII-alphabetic regexes, and rounding
//! follows round-half-to-even so reported scores are stable across runs.

use regex::Regex;
use std::collections::HashMap;

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Counts non-overlapping matches of `regex` in `text`.
pub fn count_matches(regex: &Regex, text: &str) -> usize {
    regex.find_iter(text).count()
}

/// Builds a regex matching whole ASCII-alphabetic words of at least `min_len` letters.
///
/// # Panics
/// Never in practice; the pattern is assembled from a fixed template.
pub fn alphabetic_word_regex(min_len: usize) -> Regex {
    Regex::new(&format!(r"\b[a-zA-Z]{{{min_len},}}\b")).expect("Invalid word regex")
}

/// Extracts lowercase alphabetic words of at least the regex's minimum length.
pub fn alphabetic_words<'a>(regex: &Regex, lowercase_text: &'a str) -> Vec<&'a str> {
    regex
        .find_iter(lowercase_text)
        .map(|m| m.as_str())
        .collect()
}

/// Ranks tokens by descending frequency.
///
/// Ties keep the order in which tokens were first seen, so the ranking is
/// deterministic for a given input.
pub fn rank_by_frequency<I, S>(tokens: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for token in tokens {
        let token = token.as_ref();
        match positions.get(token) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(token.to_string(), counts.len());
                counts.push((token.to_string(), 1));
            }
        }
    }

    // sort_by is stable, which preserves first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Rounds `value` to `places` decimal places, ties to even.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round_ties_even() / factor
}

/// Clamps a score into the `[0, 100]` range.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Returns at most `max_chars` characters of `text`, respecting char boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one two\nthree\tfour"), 4);
    }

    #[test]
    fn test_alphabetic_words_respects_min_length() {
        let re = alphabetic_word_regex(4);
        let words = alphabetic_words(&re, "the quick brown fox jumps");
        assert_eq!(words, vec!["quick", "brown", "jumps"]);
    }

    #[test]
    fn test_alphabetic_words_skips_mixed_tokens() {
        let re = alphabetic_word_regex(5);
        let words = alphabetic_words(&re, "abc123 hello world2 planet");
        assert_eq!(words, vec!["hello", "planet"]);
    }

    #[test]
    fn test_rank_by_frequency_orders_by_count_then_first_seen() {
        let ranked = rank_by_frequency(["beta", "alpha", "beta", "gamma", "alpha", "delta"]);
        assert_eq!(
            ranked,
            vec![
                ("beta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 1),
                ("delta".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_rank_by_frequency_empty() {
        let ranked = rank_by_frequency(Vec::<String>::new());
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_round_to_ties_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(12.34, 1), 12.3);
        assert_eq!(round_to(0.12345, 3), 0.123);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-12.0), 0.0);
        assert_eq!(clamp_score(55.5), 55.5);
        assert_eq!(clamp_score(121.0), 100.0);
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
