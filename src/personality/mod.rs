//! Bounded personality trait vectors.
//!
//! Each owner has one value in `[0.0, 1.0]` per trait name. Values move through
//! explicit updates, reasoned adjustments, and feedback from emotions. A
//! reasoned adjustment is published as [`DomainEvent::TraitAdjusted`] on the
//! engine's [`EventBus`] before the adjustment commits.

pub mod catalog;
pub mod store;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AnimaError, Result};
use crate::events::{DomainEvent, EventBus};
use crate::memory::types::OwnerKey;
use catalog::PersonalityCatalog;

/// Traits above this value count as dominant and feed archetype rules.
const DOMINANT_THRESHOLD: f64 = 0.7;
const MAX_TRAIT_NAME_CHARS: usize = 50;
const MAX_REASON_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraitValue {
    pub value: f64,
    pub last_updated: DateTime<Utc>,
}

/// An owner's traits at one point in time, keyed by trait name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraitSnapshot {
    pub traits: BTreeMap<String, TraitValue>,
}

impl TraitSnapshot {
    pub fn value(&self, trait_name: &str) -> Option<f64> {
        self.traits.get(trait_name).map(|t| t.value)
    }

    pub fn values(&self) -> BTreeMap<String, f64> {
        self.traits
            .iter()
            .map(|(name, t)| (name.clone(), t.value))
            .collect()
    }

    /// Names of traits above 0.7, alphabetical.
    pub fn dominant_traits(&self) -> Vec<String> {
        self.traits
            .iter()
            .filter(|(_, t)| t.value > DOMINANT_THRESHOLD)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Outcome of [`PersonalityEngine::adjust_trait`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitAdjustment {
    pub trait_name: String,
    pub old_value: f64,
    pub new_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    ShyCaring,
    CheerfulPlayful,
    IntellectualCurious,
    ConfidentLoyal,
    EmpatheticNurturing,
    Balanced,
}

impl Archetype {
    /// Ordered rules; the first whose two traits both exceed 0.7 wins.
    const RULES: [(Archetype, &'static str, &'static str); 5] = [
        (Self::ShyCaring, "shyness", "caring"),
        (Self::CheerfulPlayful, "cheerfulness", "playfulness"),
        (Self::IntellectualCurious, "intelligence", "curiosity"),
        (Self::ConfidentLoyal, "confidence", "loyalty"),
        (Self::EmpatheticNurturing, "empathy", "caring"),
    ];

    /// Classify a snapshot. Missing traits count as 0.
    pub fn classify(snapshot: &TraitSnapshot) -> Self {
        let value = |name: &str| snapshot.value(name).unwrap_or(0.0);
        Self::RULES
            .iter()
            .find(|&&(_, a, b)| value(a) > DOMINANT_THRESHOLD && value(b) > DOMINANT_THRESHOLD)
            .map(|&(archetype, _, _)| archetype)
            .unwrap_or(Self::Balanced)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShyCaring => "shy_caring",
            Self::CheerfulPlayful => "cheerful_playful",
            Self::IntellectualCurious => "intellectual_curious",
            Self::ConfidentLoyal => "confident_loyal",
            Self::EmpatheticNurturing => "empathetic_nurturing",
            Self::Balanced => "balanced",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ShyCaring => "A gentle and caring soul who tends to be reserved but deeply empathetic towards others.",
            Self::CheerfulPlayful => "An energetic and joyful personality who brings light and fun to every interaction.",
            Self::IntellectualCurious => "A thoughtful and inquisitive mind who loves learning and exploring new ideas.",
            Self::ConfidentLoyal => "A strong and dependable character who stands by their beliefs and those they care about.",
            Self::EmpatheticNurturing => "A warm and understanding personality who naturally cares for others' wellbeing.",
            Self::Balanced => "A well-rounded personality with a good balance of various traits.",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highlight clauses, in output order: (trait, threshold, phrase).
const HIGHLIGHTS: [(&str, f64, &str); 5] = [
    ("cheerfulness", 0.8, "exceptionally cheerful"),
    ("shyness", 0.8, "quite shy"),
    ("intelligence", 0.8, "highly intelligent"),
    ("playfulness", 0.8, "very playful"),
    ("loyalty", 0.9, "extremely loyal"),
];

/// Archetype sentence followed by any trait highlights.
pub fn describe(snapshot: &TraitSnapshot, archetype: Archetype) -> String {
    let highlights: Vec<&str> = HIGHLIGHTS
        .iter()
        .filter(|&&(name, threshold, _)| snapshot.value(name).unwrap_or(0.0) > threshold)
        .map(|&(_, _, phrase)| phrase)
        .collect();

    let mut text = archetype.description().to_string();
    if !highlights.is_empty() {
        text.push_str(&format!(" Particularly {}.", highlights.join(", ")));
    }
    text
}

/// Readable view of an owner's personality.
#[derive(Debug, Clone, Serialize)]
pub struct PersonalitySummary {
    pub archetype: Archetype,
    pub summary: String,
    pub dominant_traits: Vec<String>,
    pub traits: BTreeMap<String, f64>,
}

/// Reads and evolves trait vectors.
#[derive(Debug, Clone)]
pub struct PersonalityEngine {
    catalog: Arc<PersonalityCatalog>,
    events: EventBus,
}

impl PersonalityEngine {
    pub fn new(catalog: Arc<PersonalityCatalog>, events: EventBus) -> Self {
        Self { catalog, events }
    }

    pub fn catalog(&self) -> &PersonalityCatalog {
        &self.catalog
    }

    /// Write the default trait vector unless the owner already has traits.
    ///
    /// Returns whether rows were written.
    pub fn initialize(&self, conn: &mut Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<bool> {
        owner.validate()?;
        let tx = conn.transaction()?;
        let written = self.seed_vector(&tx, owner, self.catalog.defaults(), now)?;
        tx.commit()?;
        Ok(written)
    }

    /// Like [`Self::initialize`], with a named preset layered over the defaults.
    pub fn initialize_with_preset(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        preset: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        owner.validate()?;
        let preset = preset.trim().to_lowercase();
        let vector = self.catalog.preset_vector(&preset).ok_or_else(|| {
            let known: Vec<&str> = self.catalog.preset_names().collect();
            AnimaError::Validation(format!(
                "unknown personality preset '{preset}' (expected one of: {})",
                known.join(", ")
            ))
        })?;

        let tx = conn.transaction()?;
        let written = self.seed_vector(&tx, owner, &vector, now)?;
        tx.commit()?;
        if written {
            tracing::info!(owner = %owner, preset = %preset, "personality initialized from preset");
        }
        Ok(written)
    }

    /// Current traits, initializing the defaults first for a new owner.
    pub fn traits(&self, conn: &mut Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<TraitSnapshot> {
        let tx = conn.transaction()?;
        let snapshot = self.traits_in(&tx, owner, now)?;
        tx.commit()?;
        Ok(snapshot)
    }

    /// [`Self::traits`] on the caller's transaction.
    pub(crate) fn traits_in(&self, conn: &Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<TraitSnapshot> {
        owner.validate()?;
        self.seed_vector(conn, owner, self.catalog.defaults(), now)?;
        let traits = store::query_traits(conn, owner)?.into_iter().collect();
        Ok(TraitSnapshot { traits })
    }

    /// Set a trait to an exact value.
    pub fn update_trait(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        trait_name: &str,
        value: f64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        owner.validate()?;
        let name = normalize_trait_name(trait_name)?;
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(AnimaError::Validation(format!(
                "trait value must be between 0.0 and 1.0, got {value}"
            )));
        }

        let tx = conn.transaction()?;
        self.seed_vector(&tx, owner, self.catalog.defaults(), now)?;
        store::upsert_trait(&tx, owner, &name, value, now)?;
        tx.commit()?;

        tracing::info!(owner = %owner, trait_name = %name, value, "trait updated");
        Ok(())
    }

    /// Move a trait by `delta`, clamped to `[0.0, 1.0]`.
    ///
    /// With a `reason`, the change is published as [`DomainEvent::TraitAdjusted`].
    pub fn adjust_trait(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        trait_name: &str,
        delta: f64,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TraitAdjustment> {
        let tx = conn.transaction()?;
        let adjustment = self.adjust_trait_in(&tx, owner, trait_name, delta, reason, now)?;
        tx.commit()?;
        Ok(adjustment)
    }

    /// [`Self::adjust_trait`] on the caller's transaction.
    pub(crate) fn adjust_trait_in(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        trait_name: &str,
        delta: f64,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TraitAdjustment> {
        owner.validate()?;
        let name = normalize_trait_name(trait_name)?;
        if !delta.is_finite() {
            return Err(AnimaError::validation("trait adjustment must be a finite number"));
        }
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        if let Some(r) = reason {
            if r.chars().count() > MAX_REASON_CHARS {
                return Err(AnimaError::Validation(format!(
                    "reason too long (max {MAX_REASON_CHARS} characters)"
                )));
            }
        }

        self.seed_vector(conn, owner, self.catalog.defaults(), now)?;
        let old_value = store::trait_value(conn, owner, &name)?
            .unwrap_or_else(|| self.catalog.default_value(&name));
        let new_value = (old_value + delta).clamp(0.0, 1.0);
        store::upsert_trait(conn, owner, &name, new_value, now)?;

        if let Some(reason) = reason {
            self.events.publish(
                conn,
                &DomainEvent::TraitAdjusted {
                    owner: owner.clone(),
                    trait_name: name.clone(),
                    old_value,
                    new_value,
                    adjustment: delta,
                    reason: reason.to_string(),
                    at: now,
                },
            )?;
        }

        tracing::info!(owner = %owner, trait_name = %name, old_value, new_value, "trait adjusted");

        Ok(TraitAdjustment {
            trait_name: name,
            old_value,
            new_value,
        })
    }

    /// Nudge traits according to the feedback table for `emotion`, scaled by intensity.
    pub fn apply_emotion_feedback(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        emotion: &str,
        intensity: f64,
        now: DateTime<Utc>,
    ) -> Result<Vec<TraitAdjustment>> {
        let reason = format!("Emotional influence from {emotion} (intensity: {intensity:.1})");
        self.catalog
            .emotion_feedback(emotion)
            .iter()
            .map(|(trait_name, delta)| {
                self.adjust_trait_in(conn, owner, trait_name, delta * intensity, Some(&reason), now)
            })
            .collect()
    }

    pub fn archetype(&self, snapshot: &TraitSnapshot) -> Archetype {
        Archetype::classify(snapshot)
    }

    pub fn summary(&self, conn: &mut Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<PersonalitySummary> {
        let snapshot = self.traits(conn, owner, now)?;
        let archetype = self.archetype(&snapshot);
        Ok(PersonalitySummary {
            archetype,
            summary: describe(&snapshot, archetype),
            dominant_traits: snapshot.dominant_traits(),
            traits: snapshot.values(),
        })
    }

    /// Transient view of `snapshot` under a mood. Unknown moods leave it unchanged.
    pub fn traits_under_mood(&self, snapshot: &TraitSnapshot, mood: &str) -> TraitSnapshot {
        let mut view = snapshot.clone();
        let Some(modifiers) = self.catalog.mood_modifiers(&mood.trim().to_lowercase()) else {
            return view;
        };
        for (name, offset) in modifiers {
            let base = snapshot
                .value(name)
                .unwrap_or_else(|| self.catalog.default_value(name));
            let last_updated = snapshot
                .traits
                .get(name)
                .map(|t| t.last_updated)
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            view.traits.insert(
                name.clone(),
                TraitValue {
                    value: (base + offset).clamp(0.0, 1.0),
                    last_updated,
                },
            );
        }
        view
    }

    /// Write `vector` if the owner has no traits yet. Returns whether rows were written.
    fn seed_vector(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        vector: &[(String, f64)],
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if store::has_traits(conn, owner)? {
            return Ok(false);
        }
        for (name, value) in vector {
            store::upsert_trait(conn, owner, name, *value, now)?;
        }
        tracing::debug!(owner = %owner, traits = vector.len(), "personality initialized");
        Ok(true)
    }
}

fn normalize_trait_name(name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(AnimaError::validation("trait name must not be empty"));
    }
    if name.chars().count() > MAX_TRAIT_NAME_CHARS {
        return Err(AnimaError::Validation(format!(
            "trait name too long (max {MAX_TRAIT_NAME_CHARS} characters)"
        )));
    }
    Ok(name)
}
