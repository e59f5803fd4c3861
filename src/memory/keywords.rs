//! Keyword extraction: the term sets relevance and importance scoring work on.
//!
//! [`KeywordExtractor`] is the seam; [`StemmingExtractor`] is the default
//! implementation: normalize, tokenize, drop stop words and short tokens, stem,
//! and return the most frequent terms first.

use rust_stemmers::{Algorithm, Stemmer};
use serde::Serialize;
use std::collections::HashMap;

/// Identifier recorded in `schema_meta` for keywords produced by [`StemmingExtractor`].
pub const STEMMER_ID: &str = "snowball-english";

/// Default number of keywords pulled from a text.
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Turns text into an ordered list of normalized terms.
///
/// Implementations return at most `max_keywords` distinct terms, most frequent
/// first, ties broken by first occurrence.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &str, max_keywords: usize) -> Vec<String>;
}

/// English stop words. Contractions appear without apostrophes because
/// normalization strips them before lookup.
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "don", "dont", "should", "shouldve", "now", "ain", "aren", "arent", "couldn", "couldnt",
    "didn", "didnt", "doesn", "doesnt", "hadn", "hadnt", "hasn", "hasnt", "haven", "havent",
    "isn", "isnt", "mightn", "mightnt", "mustn", "mustnt", "needn", "neednt", "shan", "shant",
    "shouldn", "shouldnt", "wasn", "wasnt", "weren", "werent", "won", "wont", "wouldn",
    "wouldnt", "youd", "youll", "youre", "youve", "shes", "thatll",
];

/// Stop-word filtering plus Snowball English stemming.
pub struct StemmingExtractor {
    stemmer: Stemmer,
}

impl StemmingExtractor {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for StemmingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor for StemmingExtractor {
    fn extract(&self, text: &str, max_keywords: usize) -> Vec<String> {
        if max_keywords == 0 {
            return Vec::new();
        }

        // term -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let terms = tokenize(text)
            .into_iter()
            .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(&word.as_str()))
            .map(|word| self.stemmer.stem(&word).into_owned());

        for (position, term) in terms.enumerate() {
            counts.entry(term).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        ranked
            .into_iter()
            .take(max_keywords)
            .map(|(term, _)| term)
            .collect()
    }
}

/// Keywords of a free text alongside its normalized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordAnalysis {
    pub keywords: Vec<String>,
    pub cleaned_text: String,
    pub word_count: usize,
}

/// Extract keywords from `text` and report its cleaned form and word count.
pub fn analyze(extractor: &dyn KeywordExtractor, text: &str, max_keywords: usize) -> KeywordAnalysis {
    let cleaned_text = clean_text(text);
    KeywordAnalysis {
        keywords: extractor.extract(text, max_keywords),
        word_count: cleaned_text.split_whitespace().count(),
        cleaned_text,
    }
}

/// Collapse whitespace runs to one space, drop characters outside
/// word/whitespace/basic punctuation, and lower-case.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | ',' | '!' | '?' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lower-case, strip characters outside word/whitespace/basic punctuation,
/// split on whitespace and sentence punctuation, keep purely alphabetic tokens.
fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | ',' | '!' | '?' | '-'))
        .flat_map(char::to_lowercase)
        .collect();

    cleaned
        .split(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?'))
        .filter(|token| !token.is_empty() && token.chars().all(char::is_alphabetic))
        .map(str::to_string)
        .collect()
}
