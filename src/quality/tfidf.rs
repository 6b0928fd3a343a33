//! TF-IDF vectorization over word n-grams.
//!
//! Tokens are runs of two or more word characters, lowercased, with English
//! stop words removed before n-grams are formed. Term weights use smoothed
//! inverse document frequency and each document vector is L2-normalized.

use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// English stop words removed before n-gram construction.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
    "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many",
    "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most",
    "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Fits a vocabulary over a small corpus and produces normalized TF-IDF rows.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_max: usize,
    token: Regex,
    stop_words: HashSet<&'static str>,
}

/// TF-IDF rows for a fitted corpus, one dense row per document.
///
/// Columns follow the lexically sorted vocabulary, so dot products are summed
/// in the same order regardless of document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatrix {
    vocabulary: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TfidfVectorizer {
    /// Creates a vectorizer keeping at most `max_features` terms of up to
    /// `ngram_max` words each.
    ///
    /// # Panics
    /// Panics if the token pattern fails to compile, which cannot happen for
    /// the fixed pattern used here.
    pub fn new(max_features: usize, ngram_max: usize) -> Self {
        Self {
            max_features: max_features.max(1),
            ngram_max: ngram_max.max(1),
            token: Regex::new(r"\b\w\w+\b").expect("Invalid token regex"),
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Splits a document into its n-gram terms, in document order.
    pub fn terms(&self, document: &str) -> Vec<String> {
        let lowercase = document.to_lowercase();
        let tokens: Vec<&str> = self
            .token
            .find_iter(&lowercase)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        for n in 2..=self.ngram_max {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Fits the vocabulary on `documents` and returns their TF-IDF rows.
    ///
    /// Returns `None` when no document contributes a single term.
    pub fn fit_transform(&self, documents: &[&str]) -> Option<TfidfMatrix> {
        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for term in self.terms(doc) {
                    *tf.entry(term).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        // term -> (corpus frequency, document frequency)
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for tf in &counts {
            for (term, count) in tf {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }
        if stats.is_empty() {
            return None;
        }

        let mut candidates: Vec<(&str, usize, usize)> =
            stats.into_iter().map(|(t, (cf, df))| (t, cf, df)).collect();
        if candidates.len() > self.max_features {
            // stable sort keeps lexical order among equal frequencies
            candidates.sort_by(|a, b| b.1.cmp(&a.1));
            candidates.truncate(self.max_features);
            candidates.sort_by(|a, b| a.0.cmp(b.0));
        }

        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = candidates
            .iter()
            .map(|(_, _, df)| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: Vec<f64> = candidates
                    .iter()
                    .zip(&idf)
                    .map(|((term, _, _), weight)| {
                        tf.get(*term).copied().unwrap_or(0) as f64 * weight
                    })
                    .collect();
                let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|v| *v /= norm);
                }
                row
            })
            .collect();

        Some(TfidfMatrix {
            vocabulary: candidates.iter().map(|(t, _, _)| t.to_string()).collect(),
            rows,
        })
    }
}

impl TfidfMatrix {
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cosine similarity between two rows, clamped to `[0, 1]`.
    ///
    /// Rows are unit length (or all zero), so this is their dot product.
    /// A zero row or an out-of-range index yields 0.0.
    pub fn cosine(&self, a: usize, b: usize) -> f64 {
        match (self.rows.get(a), self.rows.get(b)) {
            (Some(x), Some(y)) => x
                .iter()
                .zip(y)
                .map(|(p, q)| p * q)
                .sum::<f64>()
                .clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}
