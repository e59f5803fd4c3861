//! Lookup tables for emotion categories, compatibility and intensity blending.

use chrono::Duration;
use serde::Serialize;
use std::collections::HashMap;

/// Coarse grouping of emotion labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionCategory {
    Positive,
    Negative,
    Neutral,
    Special,
}

impl EmotionCategory {
    /// Table order. Also the tie-break order for dominant-category analysis.
    pub const ALL: [EmotionCategory; 4] = [
        Self::Positive,
        Self::Negative,
        Self::Neutral,
        Self::Special,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Special => "special",
        }
    }
}

impl std::fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const POSITIVE: &[&str] = &["happy", "excited", "cheerful", "content", "loving", "proud", "grateful"];
const NEGATIVE: &[&str] = &["sad", "angry", "frustrated", "disappointed", "worried", "lonely"];
const NEUTRAL: &[&str] = &["calm", "neutral", "curious", "thoughtful", "focused"];
const SPECIAL: &[&str] = &["embarrassed", "surprised", "confused", "mischievous", "sleepy"];

/// Immutable emotion tables handed to [`super::EmotionEngine`].
#[derive(Debug, Clone)]
pub struct EmotionCatalog {
    members: HashMap<String, EmotionCategory>,
    /// Cross-category scores, stored in both directions.
    pair_scores: HashMap<(EmotionCategory, EmotionCategory), f64>,
    default_pair_score: f64,
    same_category_score: f64,
    /// Directional reinforcement factors used when blending intensities.
    reinforcement: HashMap<(String, String), f64>,
    same_emotion_factor: f64,
    decay_rate_per_hour: f64,
}

impl Default for EmotionCatalog {
    fn default() -> Self {
        use EmotionCategory::*;

        let mut members = HashMap::new();
        for (category, labels) in [
            (Positive, POSITIVE),
            (Negative, NEGATIVE),
            (Neutral, NEUTRAL),
            (Special, SPECIAL),
        ] {
            for label in labels {
                members.insert((*label).to_string(), category);
            }
        }

        let mut pair_scores = HashMap::new();
        for (a, b, score) in [
            (Positive, Neutral, 0.7),
            (Negative, Neutral, 0.6),
            (Positive, Special, 0.5),
            (Negative, Special, 0.4),
            (Positive, Negative, 0.2),
        ] {
            pair_scores.insert((a, b), score);
            pair_scores.insert((b, a), score);
        }

        let reinforcement = [
            ("happy", "excited", 1.2),
            ("happy", "content", 1.1),
            ("sad", "angry", 0.8),
            ("angry", "frustrated", 1.3),
            ("surprised", "curious", 1.1),
            ("fearful", "anxious", 1.2),
        ]
        .into_iter()
        .map(|(from, to, factor)| ((from.to_string(), to.to_string()), factor))
        .collect();

        Self {
            members,
            pair_scores,
            default_pair_score: 0.3,
            same_category_score: 0.8,
            reinforcement,
            same_emotion_factor: 0.9,
            decay_rate_per_hour: 0.1,
        }
    }
}

impl EmotionCatalog {
    /// Category of a label. Unknown labels are neutral.
    pub fn category(&self, emotion: &str) -> EmotionCategory {
        self.members
            .get(emotion)
            .copied()
            .unwrap_or(EmotionCategory::Neutral)
    }

    /// How naturally `a` and `b` sit together, in `[0.0, 1.0]`.
    pub fn compatibility(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let (ca, cb) = (self.category(a), self.category(b));
        if ca == cb {
            return self.same_category_score;
        }
        self.pair_scores
            .get(&(ca, cb))
            .copied()
            .unwrap_or(self.default_pair_score)
    }

    /// Score for moving from one emotional state to another. Large intensity jumps cost up to 0.15.
    pub fn transition_score(&self, from: &str, from_intensity: f64, to: &str, to_intensity: f64) -> f64 {
        let intensity_factor = 1.0 - (to_intensity - from_intensity).abs() * 0.5;
        self.compatibility(from, to) * 0.7 + intensity_factor * 0.3
    }

    /// Intensity of `new` after `current` has decayed for `elapsed`.
    pub fn blend_intensity(&self, current: &str, new: &str, current_intensity: f64, elapsed: Duration) -> f64 {
        let hours = elapsed.num_milliseconds().max(0) as f64 / 3_600_000.0;
        let decayed = current_intensity * (-self.decay_rate_per_hour * hours).exp();

        let factor = if current == new {
            self.same_emotion_factor
        } else {
            self.reinforcement
                .get(&(current.to_string(), new.to_string()))
                .copied()
                .unwrap_or(1.0)
        };

        (decayed * 0.3 + 0.5 * 0.7 * factor).clamp(0.0, 1.0)
    }
}

/// Human-readable advice for a compatibility score.
pub fn recommendation(score: f64) -> &'static str {
    if score > 0.8 {
        "Excellent transition - very natural"
    } else if score > 0.6 {
        "Good transition - feels natural"
    } else if score > 0.4 {
        "Moderate transition - acceptable with context"
    } else if score > 0.2 {
        "Challenging transition - needs strong context"
    } else {
        "Difficult transition - consider gradual change"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn categories_and_unknown_labels() {
        let c = EmotionCatalog::default();
        assert_eq!(c.category("proud"), EmotionCategory::Positive);
        assert_eq!(c.category("lonely"), EmotionCategory::Negative);
        assert_eq!(c.category("sleepy"), EmotionCategory::Special);
        assert_eq!(c.category("wistful"), EmotionCategory::Neutral);
    }

    #[test]
    fn compatibility_table() {
        let c = EmotionCatalog::default();
        assert_eq!(c.compatibility("happy", "happy"), 1.0);
        assert_eq!(c.compatibility("happy", "proud"), 0.8);
        assert_eq!(c.compatibility("happy", "calm"), 0.7);
        assert_eq!(c.compatibility("calm", "sad"), 0.6);
        assert_eq!(c.compatibility("surprised", "happy"), 0.5);
        assert_eq!(c.compatibility("angry", "confused"), 0.4);
        assert_eq!(c.compatibility("sad", "happy"), 0.2);
        // unknown labels are neutral, so they pair with each other as same-category
        assert_eq!(c.compatibility("wistful", "calm"), 0.8);
    }

    #[test]
    fn transition_score_penalizes_intensity_jumps() {
        let c = EmotionCatalog::default();
        assert!((c.transition_score("happy", 0.5, "happy", 0.5) - 1.0).abs() < 1e-12);
        // 0.2 * 0.7 + (1 - 0.8 * 0.5) * 0.3
        assert!((c.transition_score("sad", 0.1, "happy", 0.9) - 0.32).abs() < 1e-12);
    }

    #[test]
    fn blend_uses_reinforcement_and_decay() {
        let c = EmotionCatalog::default();
        let fresh = c.blend_intensity("happy", "excited", 1.0, Duration::zero());
        assert!((fresh - (0.3 + 0.35 * 1.2)).abs() < 1e-12);

        let same = c.blend_intensity("sad", "sad", 0.0, Duration::hours(3));
        assert!((same - 0.35 * 0.9).abs() < 1e-12);

        let later = c.blend_intensity("calm", "curious", 1.0, Duration::hours(10));
        let expected = (-1.0f64).exp() * 0.3 + 0.35;
        assert!((later - expected).abs() < 1e-12);
    }

    #[test]
    fn recommendations_by_band() {
        assert_eq!(recommendation(1.0), "Excellent transition - very natural");
        assert_eq!(recommendation(0.7), "Good transition - feels natural");
        assert_eq!(recommendation(0.5), "Moderate transition - acceptable with context");
        assert_eq!(recommendation(0.3), "Challenging transition - needs strong context");
        assert_eq!(recommendation(0.2), "Difficult transition - consider gradual change");
    }

    fn label() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "happy", "sad", "calm", "surprised", "angry", "curious", "mystery",
        ])
        .prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn compatibility_is_symmetric_and_reflexive(a in label(), b in label()) {
            let c = EmotionCatalog::default();
            prop_assert_eq!(c.compatibility(&a, &a), 1.0);
            prop_assert_eq!(c.compatibility(&a, &b), c.compatibility(&b, &a));
        }

        #[test]
        fn blend_stays_in_unit_interval(
            a in label(),
            b in label(),
            intensity in 0.0f64..=1.0,
            minutes in 0i64..100_000,
        ) {
            let c = EmotionCatalog::default();
            let v = c.blend_intensity(&a, &b, intensity, Duration::minutes(minutes));
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }
}
