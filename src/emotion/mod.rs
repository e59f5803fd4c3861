//! Emotional state: an append-only log per owner and the reads built on it.
//!
//! Rows are never updated. The current emotion is whatever [`current_state`]
//! reduces the live rows to, with a synthesized neutral state when nothing is
//! live. Setting an emotion also feeds the personality engine inside the same
//! transaction.

pub mod catalog;
pub mod store;

use chrono::{DateTime, Datelike, Duration, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AnimaError, Result};
use crate::memory::types::OwnerKey;
use crate::personality::PersonalityEngine;
use catalog::{recommendation, EmotionCatalog, EmotionCategory};

/// Default lifetime of an emotional state, in seconds.
pub const DEFAULT_DURATION_SECS: u64 = 3600;

const DEFAULT_EMOTION: &str = "neutral";
const DEFAULT_INTENSITY: f64 = 0.5;
const DEFAULT_CONTEXT: &str = "default state";
const MAX_LABEL_CHARS: usize = 50;
/// Timestamps are stored as RFC 3339 text and compared lexically, which only
/// holds for four-digit years.
const MAX_EXPIRY_YEAR: i32 = 9999;
const DURATION_OUT_OF_RANGE: &str = "emotion duration is out of range (expiry must fall before year 10000)";

/// One entry of the emotional log, or the synthesized default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionalState {
    /// `None` only for the synthesized default state.
    pub id: Option<String>,
    pub owner: OwnerKey,
    pub emotion: String,
    pub intensity: f64,
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
    pub duration_secs: u64,
}

impl EmotionalState {
    /// The state reported when no logged emotion is live.
    pub fn default_for(owner: &OwnerKey, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            owner: owner.clone(),
            emotion: DEFAULT_EMOTION.to_string(),
            intensity: DEFAULT_INTENSITY,
            context: Some(DEFAULT_CONTEXT.to_string()),
            created_at: now,
            duration_secs: 0,
        }
    }

    pub fn is_default(&self) -> bool {
        self.id.is_none()
    }

    /// `created_at + duration`, or `None` if that overflows or lands past year 9999.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.duration_secs).ok()?;
        let duration = Duration::try_seconds(secs)?;
        self.created_at
            .checked_add_signed(duration)
            .filter(|end| end.year() <= MAX_EXPIRY_YEAR)
    }

    /// Live over the half-open interval `[created_at, expires_at)`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.created_at <= now && self.expires_at().is_some_and(|end| now < end)
    }

    /// Whole seconds until expiry, floored at zero.
    pub fn remaining_duration(&self, now: DateTime<Utc>) -> u64 {
        self.expires_at()
            .map(|end| (end - now).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }
}

/// Reduce an owner's log to the state current at `now`.
///
/// The most recently created live row wins; among rows created at the same
/// instant, the later one in `log` wins.
pub fn current_state(owner: &OwnerKey, log: &[EmotionalState], now: DateTime<Utc>) -> EmotionalState {
    log.iter()
        .filter(|state| state.is_live(now))
        .max_by_key(|state| state.created_at)
        .cloned()
        .unwrap_or_else(|| EmotionalState::default_for(owner, now))
}

/// Result of [`EmotionEngine::transition_emotion`].
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub state: EmotionalState,
    pub transition_score: f64,
    pub previous: EmotionalState,
}

/// How a target emotion would sit with the current one.
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    pub current_emotion: String,
    pub current_category: EmotionCategory,
    pub target_emotion: String,
    pub target_category: EmotionCategory,
    pub compatibility_score: f64,
    pub recommendation: String,
    /// Starting intensity for the target after the current emotion's decay.
    pub suggested_intensity: f64,
}

/// Counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub special: usize,
}

impl CategoryDistribution {
    pub fn get(&self, category: EmotionCategory) -> usize {
        match category {
            EmotionCategory::Positive => self.positive,
            EmotionCategory::Negative => self.negative,
            EmotionCategory::Neutral => self.neutral,
            EmotionCategory::Special => self.special,
        }
    }

    fn increment(&mut self, category: EmotionCategory) {
        match category {
            EmotionCategory::Positive => self.positive += 1,
            EmotionCategory::Negative => self.negative += 1,
            EmotionCategory::Neutral => self.neutral += 1,
            EmotionCategory::Special => self.special += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionPatterns {
    pub total_emotions: usize,
    pub average_intensity: f64,
    pub category_distribution: CategoryDistribution,
    pub dominant_category: EmotionCategory,
    pub mood_stability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmotionHistory {
    pub period_hours: u32,
    /// Newest first.
    pub emotions: Vec<EmotionalState>,
    /// `None` when the window is empty.
    pub patterns: Option<EmotionPatterns>,
}

/// Writes and reads the emotional log.
#[derive(Debug, Clone)]
pub struct EmotionEngine {
    catalog: Arc<EmotionCatalog>,
    personality: PersonalityEngine,
}

impl EmotionEngine {
    pub fn new(catalog: Arc<EmotionCatalog>, personality: PersonalityEngine) -> Self {
        Self {
            catalog,
            personality,
        }
    }

    pub fn catalog(&self) -> &EmotionCatalog {
        &self.catalog
    }

    /// Append a state and apply its personality feedback in one transaction.
    pub fn set_emotion(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        emotion: &str,
        intensity: f64,
        context: Option<&str>,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<EmotionalState> {
        let tx = conn.transaction()?;
        let state = self.set_emotion_in(&tx, owner, emotion, intensity, context, duration_secs, now)?;
        tx.commit()?;
        Ok(state)
    }

    /// [`Self::set_emotion`] on the caller's transaction.
    pub(crate) fn set_emotion_in(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        emotion: &str,
        intensity: f64,
        context: Option<&str>,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<EmotionalState> {
        owner.validate()?;
        let emotion = normalize_label(emotion)?;
        validate_intensity(intensity)?;

        let mut state = EmotionalState {
            id: None,
            owner: owner.clone(),
            emotion,
            intensity,
            context: context.map(str::to_string),
            created_at: now,
            duration_secs,
        };
        if state.expires_at().is_none() {
            return Err(AnimaError::validation(DURATION_OUT_OF_RANGE));
        }

        let id = store::insert_emotion_row(conn, &state)?;
        state.id = Some(id);

        let adjustments = self
            .personality
            .apply_emotion_feedback(conn, owner, &state.emotion, intensity, now)?;

        tracing::info!(
            owner = %owner,
            emotion = %state.emotion,
            intensity,
            duration_secs,
            traits_adjusted = adjustments.len(),
            "emotion set"
        );
        Ok(state)
    }

    /// The state current at `now`.
    pub fn get_current(&self, conn: &Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<EmotionalState> {
        owner.validate()?;
        let live = store::live_emotions(conn, owner, now)?;
        Ok(current_state(owner, &live, now))
    }

    pub fn compatibility(&self, a: &str, b: &str) -> f64 {
        self.catalog.compatibility(a, b)
    }

    pub fn transition_score(&self, from: &str, from_intensity: f64, to: &str, to_intensity: f64) -> f64 {
        self.catalog
            .transition_score(from, from_intensity, to, to_intensity)
    }

    /// Move from the current state to a new one, recording how the move scored.
    pub fn transition_emotion(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        emotion: &str,
        intensity: f64,
        reason: Option<&str>,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let target = normalize_label(emotion)?;
        validate_intensity(intensity)?;

        let tx = conn.transaction()?;
        let previous = self.get_current(&tx, owner, now)?;
        let transition_score =
            self.transition_score(&previous.emotion, previous.intensity, &target, intensity);

        let mut context = format!(
            "Transitioned from {}({:.1}) to {}({:.1})",
            previous.emotion, previous.intensity, target, intensity
        );
        if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
            context.push_str(" - ");
            context.push_str(reason);
        }

        let state = self.set_emotion_in(&tx, owner, &target, intensity, Some(&context), duration_secs, now)?;
        tx.commit()?;

        tracing::debug!(owner = %owner, from = %previous.emotion, to = %state.emotion, transition_score, "emotion transitioned");

        Ok(Transition {
            state,
            transition_score,
            previous,
        })
    }

    /// Score a prospective emotion against the current one.
    pub fn compatibility_with_current(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        target: &str,
        now: DateTime<Utc>,
    ) -> Result<CompatibilityReport> {
        let target = normalize_label(target)?;
        let current = self.get_current(conn, owner, now)?;
        let score = self.compatibility(&current.emotion, &target);
        let suggested_intensity = self.catalog.blend_intensity(
            &current.emotion,
            &target,
            current.intensity,
            now - current.created_at,
        );

        Ok(CompatibilityReport {
            current_category: self.catalog.category(&current.emotion),
            target_category: self.catalog.category(&target),
            current_emotion: current.emotion,
            target_emotion: target,
            compatibility_score: score,
            recommendation: recommendation(score).to_string(),
            suggested_intensity,
        })
    }

    /// States created in the last `hours` hours, newest first, with pattern analysis.
    pub fn history(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        hours: u32,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<EmotionHistory> {
        owner.validate()?;
        if limit == 0 {
            return Err(AnimaError::validation("limit must be at least 1"));
        }
        let since = now
            .checked_sub_signed(Duration::hours(i64::from(hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let emotions = store::emotion_window(conn, owner, since, now, limit)?;
        let patterns = self.analyze(&emotions);

        tracing::debug!(owner = %owner, hours, returned = emotions.len(), "emotion history read");

        Ok(EmotionHistory {
            period_hours: hours,
            emotions,
            patterns,
        })
    }

    /// Summarize a sequence of states. `None` for an empty sequence.
    pub fn analyze(&self, emotions: &[EmotionalState]) -> Option<EmotionPatterns> {
        if emotions.is_empty() {
            return None;
        }

        let mut distribution = CategoryDistribution::default();
        for state in emotions {
            distribution.increment(self.catalog.category(&state.emotion));
        }

        // strict comparison keeps the earliest category in table order on ties
        let mut dominant = EmotionCategory::ALL[0];
        for category in EmotionCategory::ALL {
            if distribution.get(category) > distribution.get(dominant) {
                dominant = category;
            }
        }

        let total_intensity: f64 = emotions.iter().map(|s| s.intensity).sum();

        Some(EmotionPatterns {
            total_emotions: emotions.len(),
            average_intensity: total_intensity / emotions.len() as f64,
            category_distribution: distribution,
            dominant_category: dominant,
            mood_stability: self.mood_stability(emotions),
        })
    }

    /// 1.0 minus penalties for category changes (0.1) and intensity jumps (0.05 per unit)
    /// between adjacent states, floored at 0.
    pub fn mood_stability(&self, emotions: &[EmotionalState]) -> f64 {
        let penalty: f64 = emotions
            .windows(2)
            .map(|pair| {
                let category_change = if self.catalog.category(&pair[0].emotion)
                    != self.catalog.category(&pair[1].emotion)
                {
                    0.1
                } else {
                    0.0
                };
                category_change + (pair[1].intensity - pair[0].intensity).abs() * 0.05
            })
            .sum();
        (1.0 - penalty).max(0.0)
    }
}

fn normalize_label(emotion: &str) -> Result<String> {
    let label = emotion.trim().to_lowercase();
    if label.is_empty() {
        return Err(AnimaError::validation("emotion must not be empty"));
    }
    if label.chars().count() > MAX_LABEL_CHARS {
        return Err(AnimaError::Validation(format!(
            "emotion label too long (max {MAX_LABEL_CHARS} characters)"
        )));
    }
    Ok(label)
}

fn validate_intensity(intensity: f64) -> Result<()> {
    if !intensity.is_finite() || !(0.0..=1.0).contains(&intensity) {
        return Err(AnimaError::Validation(format!(
            "intensity must be between 0.0 and 1.0, got {intensity}"
        )));
    }
    Ok(())
}
