//! Flesch reading-ease and Flesch-Kincaid grade computation.
//!
//! Syllables are estimated with a vowel-group heuristic, which is accurate
//! enough for scoring trends across drafts of the same article.

/// Raw counts feeding the readability formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCounts {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
}

impl TextCounts {
    /// Counts words, sentences, and syllables in `text`.
    ///
    /// Returns `None` when the text has no words, because neither formula is
    /// defined for it.
    pub fn from_text(text: &str) -> Option<Self> {
        let words: Vec<String> = lexicon(text).collect();
        if words.is_empty() {
            return None;
        }
        let syllables = words.iter().map(|w| count_syllables(w)).sum();
        Some(Self {
            words: words.len(),
            sentences: count_sentences(text),
            syllables,
        })
    }

    fn words_per_sentence(&self) -> f64 {
        self.words as f64 / self.sentences.max(1) as f64
    }

    fn syllables_per_word(&self) -> f64 {
        self.syllables as f64 / self.words as f64
    }

    /// Flesch reading ease. Higher is easier; typical prose falls in 30..90.
    pub fn flesch_reading_ease(&self) -> f64 {
        206.835 - 1.015 * self.words_per_sentence() - 84.6 * self.syllables_per_word()
    }

    /// Flesch-Kincaid grade level (US school grade).
    pub fn flesch_kincaid_grade(&self) -> f64 {
        0.39 * self.words_per_sentence() + 11.8 * self.syllables_per_word() - 15.59
    }
}

/// Words with punctuation stripped; tokens that were only punctuation are dropped.
fn lexicon(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .collect::<String>()
        })
        .filter(|w| w.chars().any(char::is_alphanumeric))
}

/// Counts sentences terminated by `.`, `!` or `?`.
///
/// Fragments of two words or fewer (list bullets, headings, abbreviations)
/// are not counted; the result is never below one.
pub fn count_sentences(text: &str) -> usize {
    let counted = text
        .split(['.', '!', '?'])
        .filter(|fragment| lexicon(fragment).count() > 2)
        .count();
    counted.max(1)
}

/// Estimates the number of syllables in a single word.
pub fn count_syllables(word: &str) -> usize {
    let word: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if word.is_empty() {
        return 0;
    }
    if word.len() <= 3 {
        return 1;
    }

    let mut stem = word.as_str();
    for suffix in ["es", "ed"] {
        if let Some(s) = stem.strip_suffix(suffix) {
            stem = s;
            break;
        }
    }
    if !stem.ends_with("le") {
        stem = stem.strip_suffix('e').unwrap_or(stem);
    }

    let mut groups = 0;
    let mut previous_vowel = false;
    for c in stem.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }
    groups.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_syllables_common_words() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("jumped"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("readability"), 5);
    }

    #[test]
    fn test_count_syllables_ignores_punctuation_and_case() {
        assert_eq!(count_syllables("Table,"), 2);
        assert_eq!(count_syllables("123"), 0);
        assert_eq!(count_syllables(""), 0);
    }

    #[test]
    fn test_count_sentences() {
        assert_eq!(count_sentences("The cat sat down. The dog ran away! Did it rain today?"), 3);
        assert_eq!(count_sentences("No terminator but several words here"), 1);
        assert_eq!(count_sentences("Dr. Smith arrived at noon today."), 1);
    }

    #[test]
    fn test_counts_empty_text() {
        assert!(TextCounts::from_text("").is_none());
        assert!(TextCounts::from_text("  ... !!! ").is_none());
    }

    #[test]
    fn test_simple_text_is_easy() {
        let counts = TextCounts::from_text("The cat sat on the mat. The dog ran to the park.")
            .unwrap();
        assert_eq!(counts.words, 12);
        assert_eq!(counts.sentences, 2);
        assert!(counts.flesch_reading_ease() > 90.0);
        assert!(counts.flesch_kincaid_grade() < 4.0);
    }

    #[test]
    fn test_dense_text_is_harder() {
        let easy = TextCounts::from_text("We like the sun. It is warm and nice.").unwrap();
        let hard = TextCounts::from_text(
            "Organizational transformation necessitates comprehensive interdisciplinary \
             collaboration, particularly regarding infrastructural modernization initiatives.",
        )
        .unwrap();
        assert!(hard.flesch_reading_ease() < easy.flesch_reading_ease());
        assert!(hard.flesch_kincaid_grade() > easy.flesch_kincaid_grade());
    }
}
