//! Trait defaults, presets, emotion feedback and mood tables.

use std::collections::BTreeMap;

/// Value assumed for a trait that has no default and no stored row.
pub const UNKNOWN_TRAIT_DEFAULT: f64 = 0.5;

type TraitTable = Vec<(String, f64)>;

fn table(entries: &[(&str, f64)]) -> TraitTable {
    entries.iter().map(|(name, v)| ((*name).to_string(), *v)).collect()
}

/// Immutable personality tables handed to [`super::PersonalityEngine`].
#[derive(Debug, Clone)]
pub struct PersonalityCatalog {
    defaults: TraitTable,
    presets: BTreeMap<String, TraitTable>,
    emotion_feedback: BTreeMap<String, TraitTable>,
    mood_modifiers: BTreeMap<String, TraitTable>,
}

impl Default for PersonalityCatalog {
    fn default() -> Self {
        let defaults = table(&[
            ("cheerfulness", 0.7),
            ("shyness", 0.3),
            ("playfulness", 0.6),
            ("caring", 0.8),
            ("intelligence", 0.7),
            ("curiosity", 0.6),
            ("loyalty", 0.9),
            ("empathy", 0.8),
            ("confidence", 0.5),
            ("spontaneity", 0.4),
            ("romanticism", 0.6),
            ("protectiveness", 0.7),
            ("mischievousness", 0.3),
            ("patience", 0.6),
        ]);

        let presets = [
            ("tsundere", table(&[
                ("shyness", 0.8), ("confidence", 0.3), ("caring", 0.9), ("mischievousness", 0.6),
                ("loyalty", 0.9), ("empathy", 0.7), ("romanticism", 0.8), ("cheerfulness", 0.4),
            ])),
            ("kuudere", table(&[
                ("shyness", 0.4), ("confidence", 0.8), ("intelligence", 0.9), ("caring", 0.8),
                ("empathy", 0.6), ("cheerfulness", 0.3), ("loyalty", 0.9), ("patience", 0.9),
            ])),
            ("dandere", table(&[
                ("shyness", 0.9), ("caring", 0.9), ("empathy", 0.9), ("intelligence", 0.8),
                ("confidence", 0.2), ("cheerfulness", 0.6), ("loyalty", 0.9), ("patience", 0.8),
            ])),
            ("yandere", table(&[
                ("loyalty", 1.0), ("protectiveness", 1.0), ("romanticism", 1.0), ("caring", 0.9),
                ("confidence", 0.7), ("shyness", 0.3), ("empathy", 0.5), ("mischievousness", 0.8),
            ])),
            ("genki", table(&[
                ("cheerfulness", 1.0), ("playfulness", 0.9), ("spontaneity", 0.9), ("confidence", 0.8),
                ("curiosity", 0.9), ("empathy", 0.8), ("caring", 0.8), ("shyness", 0.1),
            ])),
            ("ojousama", table(&[
                ("confidence", 0.9), ("intelligence", 0.8), ("cheerfulness", 0.7), ("caring", 0.6),
                ("romanticism", 0.7), ("patience", 0.4), ("shyness", 0.2), ("protectiveness", 0.5),
            ])),
        ]
        .into_iter()
        .map(|(name, t)| (name.to_string(), t))
        .collect();

        let emotion_feedback = [
            ("happy", table(&[("cheerfulness", 0.01), ("confidence", 0.005)])),
            ("sad", table(&[("cheerfulness", -0.005), ("shyness", 0.005)])),
            ("excited", table(&[("playfulness", 0.01), ("spontaneity", 0.01)])),
            ("angry", table(&[("confidence", 0.005), ("empathy", -0.005)])),
            ("caring", table(&[("caring", 0.01), ("empathy", 0.01)])),
            ("embarrassed", table(&[("shyness", 0.01), ("confidence", -0.005)])),
            ("proud", table(&[("confidence", 0.01), ("cheerfulness", 0.005)])),
        ]
        .into_iter()
        .map(|(name, t)| (name.to_string(), t))
        .collect();

        let mood_modifiers = [
            ("happy", table(&[("cheerfulness", 0.3), ("playfulness", 0.2), ("confidence", 0.1)])),
            ("sad", table(&[("cheerfulness", -0.3), ("empathy", 0.2), ("shyness", 0.1)])),
            ("excited", table(&[("cheerfulness", 0.2), ("spontaneity", 0.3), ("playfulness", 0.2)])),
            ("angry", table(&[("patience", -0.3), ("mischievousness", 0.2), ("confidence", 0.2)])),
            ("shy", table(&[("shyness", 0.3), ("confidence", -0.2), ("caring", 0.1)])),
            ("loving", table(&[("romanticism", 0.3), ("caring", 0.2), ("empathy", 0.2)])),
            ("playful", table(&[("playfulness", 0.3), ("mischievousness", 0.2), ("spontaneity", 0.1)])),
            ("protective", table(&[("protectiveness", 0.3), ("loyalty", 0.2), ("caring", 0.1)])),
            ("curious", table(&[("curiosity", 0.3), ("intelligence", 0.1), ("confidence", 0.1)])),
            ("mischievous", table(&[("mischievousness", 0.3), ("playfulness", 0.2), ("confidence", 0.1)])),
        ]
        .into_iter()
        .map(|(name, t)| (name.to_string(), t))
        .collect();

        Self {
            defaults,
            presets,
            emotion_feedback,
            mood_modifiers,
        }
    }
}

impl PersonalityCatalog {
    /// The full default trait vector, in table order.
    pub fn defaults(&self) -> &[(String, f64)] {
        &self.defaults
    }

    /// Default for one trait, falling back to [`UNKNOWN_TRAIT_DEFAULT`].
    pub fn default_value(&self, trait_name: &str) -> f64 {
        self.defaults
            .iter()
            .find(|(name, _)| name == trait_name)
            .map(|(_, v)| *v)
            .unwrap_or(UNKNOWN_TRAIT_DEFAULT)
    }

    /// Defaults with the named preset layered on top. `None` for an unknown preset.
    pub fn preset_vector(&self, preset: &str) -> Option<Vec<(String, f64)>> {
        let overrides = self.presets.get(preset)?;
        let mut vector = self.defaults.clone();
        for (name, value) in overrides {
            match vector.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = *value,
                None => vector.push((name.clone(), *value)),
            }
        }
        Some(vector)
    }

    pub fn preset_names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Per-unit-intensity trait deltas triggered by an emotion. Empty for unlisted emotions.
    pub fn emotion_feedback(&self, emotion: &str) -> &[(String, f64)] {
        self.emotion_feedback
            .get(emotion)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Transient trait offsets for a mood, if the mood is known.
    pub fn mood_modifiers(&self, mood: &str) -> Option<&[(String, f64)]> {
        self.mood_modifiers.get(mood).map(Vec::as_slice)
    }
}
