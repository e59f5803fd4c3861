//! Query-time relevance: Jaccard overlap of keyword sets.

use std::collections::HashSet;

use super::keywords::{KeywordExtractor, DEFAULT_MAX_KEYWORDS};

/// Similarity of two texts in `[0.0, 1.0]`.
///
/// Both texts are reduced to their keyword sets; the result is
/// `|A ∩ B| / |A ∪ B|`, or `0.0` when either set is empty.
pub fn similarity(extractor: &dyn KeywordExtractor, a: &str, b: &str) -> f64 {
    let left: HashSet<String> = extractor.extract(a, DEFAULT_MAX_KEYWORDS).into_iter().collect();
    let right: HashSet<String> = extractor.extract(b, DEFAULT_MAX_KEYWORDS).into_iter().collect();

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}
