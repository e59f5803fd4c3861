//! Importance scoring for new memories.
//!
//! Importance starts at a per-type base ([`MemoryType::base_importance`]) and
//! gains small, individually capped bonuses for content length, emotional
//! weight, direct user interaction and keyword richness. The sum is clamped to
//! `[0.0, 1.0]`.

use crate::memory::types::MemoryType;

/// Characters of content needed to earn the full length bonus.
const FULL_LENGTH_CHARS: f64 = 200.0;
const LENGTH_WEIGHT: f64 = 0.1;
const EMOTION_WEIGHT: f64 = 0.2;
const INTERACTION_BONUS: f64 = 0.1;
const KEYWORD_CAP: f64 = 0.15;
const KEYWORDS_PER_UNIT: f64 = 20.0;

/// Non-content inputs to [`score`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImportanceSignals {
    /// Signed emotional charge; only the magnitude counts.
    pub emotional_weight: f64,
    pub keyword_count: usize,
    /// The memory was authored by the user directly rather than derived.
    pub direct_interaction: bool,
}

/// Score a memory's long-term importance in `[0.0, 1.0]`.
#[must_use]
pub fn score(content: &str, memory_type: MemoryType, signals: ImportanceSignals) -> f64 {
    let length = content.chars().count() as f64;
    let content_factor = (length / FULL_LENGTH_CHARS).min(1.0) * LENGTH_WEIGHT;

    let weight = if signals.emotional_weight.is_finite() {
        signals.emotional_weight.abs().min(1.0)
    } else {
        0.0
    };
    let emotion_factor = weight * EMOTION_WEIGHT;

    let interaction_factor = if signals.direct_interaction {
        INTERACTION_BONUS
    } else {
        0.0
    };

    let keyword_factor = (signals.keyword_count as f64 / KEYWORDS_PER_UNIT).min(KEYWORD_CAP);

    let importance = memory_type.base_importance()
        + content_factor
        + emotion_factor
        + interaction_factor
        + keyword_factor;

    importance.clamp(0.0, 1.0)
}
