//! The [`Anima`] facade: one value that owns the extractor, catalogs and engines,
//! with the journal subscriber already wired in.
//!
//! Every method takes the connection and the clock explicitly, so the same
//! facade serves the MCP tools, the CLI and tests.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::sync::Arc;

use crate::config::{AnimaConfig, EmotionConfig, RetrievalConfig};
use crate::conversation::{
    ConversationContext, ConversationTurn, ProcessedTurn, CONTEXT_MEMORY_LIMIT,
    CONTEXT_MIN_IMPORTANCE, CONTEXT_SUMMARY_DAYS, DEFAULT_DETECTED_INTENSITY,
    DEFAULT_TURN_IMPORTANCE,
};
use crate::emotion::catalog::EmotionCatalog;
use crate::emotion::{CompatibilityReport, EmotionEngine, EmotionHistory, EmotionalState, Transition};
use crate::error::Result;
use crate::events::EventBus;
use crate::memory::forget::{self, DeleteResult, ImportanceUpdate};
use crate::memory::journal::PersonalityJournal;
use crate::memory::keywords::{self, KeywordAnalysis, KeywordExtractor, StemmingExtractor};
use crate::memory::maintenance::{self, SweepPolicy, SweepResult};
use crate::memory::preferences::{self, PreferenceReport, DEFAULT_PREFERENCE_LIMIT};
use crate::memory::retrieve::{self, RetrieveRequest};
use crate::memory::stats::{self, MemorySummary};
use crate::memory::store::{self, StoreMemoryRequest, StoreMemoryResult};
use crate::memory::types::{Memory, MemoryType, OwnerKey};
use crate::personality::catalog::PersonalityCatalog;
use crate::personality::{PersonalityEngine, PersonalitySummary, TraitAdjustment, TraitSnapshot};

pub struct Anima {
    extractor: Arc<dyn KeywordExtractor>,
    personality: PersonalityEngine,
    emotions: EmotionEngine,
    retrieval: RetrievalConfig,
    emotion_defaults: EmotionConfig,
}

impl Anima {
    /// Standard tables, the stemming extractor, and the personality journal.
    pub fn new(config: &AnimaConfig) -> Self {
        Self::with_parts(
            Arc::new(StemmingExtractor::new()),
            EmotionCatalog::default(),
            PersonalityCatalog::default(),
            config,
        )
    }

    pub fn with_parts(
        extractor: Arc<dyn KeywordExtractor>,
        emotion_catalog: EmotionCatalog,
        personality_catalog: PersonalityCatalog,
        config: &AnimaConfig,
    ) -> Self {
        let events = EventBus::new().with_subscriber(Arc::new(PersonalityJournal));
        let personality = PersonalityEngine::new(Arc::new(personality_catalog), events);
        let emotions = EmotionEngine::new(Arc::new(emotion_catalog), personality.clone());

        Self {
            extractor,
            personality,
            emotions,
            retrieval: config.retrieval.clone(),
            emotion_defaults: config.emotion.clone(),
        }
    }

    pub fn extractor(&self) -> &dyn KeywordExtractor {
        self.extractor.as_ref()
    }

    pub fn emotions(&self) -> &EmotionEngine {
        &self.emotions
    }

    pub fn personality(&self) -> &PersonalityEngine {
        &self.personality
    }

    // ── Memory ───────────────────────────────────────────────────────────────

    pub fn store_memory(
        &self,
        conn: &mut Connection,
        req: &StoreMemoryRequest,
        now: DateTime<Utc>,
    ) -> Result<StoreMemoryResult> {
        store::store_memory(conn, self.extractor(), req, self.retrieval.max_keywords, now)
    }

    /// A request for `owner` carrying the configured limit and importance floor.
    pub fn retrieve_request(&self, owner: OwnerKey) -> RetrieveRequest {
        RetrieveRequest {
            limit: self.retrieval.default_limit,
            min_importance: self.retrieval.default_min_importance,
            ..RetrieveRequest::new(owner)
        }
    }

    pub fn retrieve(&self, conn: &mut Connection, req: &RetrieveRequest, now: DateTime<Utc>) -> Result<Vec<Memory>> {
        retrieve::retrieve(conn, self.extractor(), req, now)
    }

    /// The owner's preference memories in rank order, also bucketed by topic.
    ///
    /// Defaults: up to 100 preferences, no importance floor. Counts as an access.
    pub fn memory_preferences(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        limit: Option<usize>,
        min_importance: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<PreferenceReport> {
        let req = RetrieveRequest {
            memory_type: Some(MemoryType::Preference),
            limit: limit.unwrap_or(DEFAULT_PREFERENCE_LIMIT),
            min_importance: min_importance.unwrap_or(0.0),
            ..RetrieveRequest::new(owner.clone())
        };
        let found = self.retrieve(conn, &req, now)?;
        Ok(preferences::categorize(found))
    }

    /// Keywords, cleaned text and word count of `text`.
    pub fn analyze_keywords(&self, text: &str, max_keywords: Option<usize>) -> KeywordAnalysis {
        keywords::analyze(
            self.extractor(),
            text,
            max_keywords.unwrap_or(self.retrieval.max_keywords),
        )
    }

    pub fn memory_summary(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<MemorySummary> {
        stats::memory_summary(conn, owner, days, now)
    }

    pub fn delete_memory(
        &self,
        conn: &mut Connection,
        memory_id: &str,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DeleteResult> {
        forget::delete_memory(conn, memory_id, reason, now)
    }

    pub fn update_importance(
        &self,
        conn: &mut Connection,
        memory_id: &str,
        importance: f64,
        now: DateTime<Utc>,
    ) -> Result<ImportanceUpdate> {
        forget::update_importance(conn, memory_id, importance, now)
    }

    pub fn retention_sweep(
        &self,
        conn: &mut Connection,
        policy: SweepPolicy,
        dry_run: bool,
        now: DateTime<Utc>,
    ) -> Result<SweepResult> {
        maintenance::retention_sweep(conn, policy, dry_run, now)
    }

    // ── Emotion ──────────────────────────────────────────────────────────────

    /// Set an emotion. `duration_secs` falls back to the configured default.
    pub fn update_emotion(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        emotion: &str,
        intensity: f64,
        context: Option<&str>,
        duration_secs: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<EmotionalState> {
        let duration = duration_secs.unwrap_or(self.emotion_defaults.default_duration_secs);
        self.emotions
            .set_emotion(conn, owner, emotion, intensity, context, duration, now)
    }

    pub fn transition_emotion(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        emotion: &str,
        intensity: f64,
        reason: Option<&str>,
        duration_secs: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let duration = duration_secs.unwrap_or(self.emotion_defaults.default_duration_secs);
        self.emotions
            .transition_emotion(conn, owner, emotion, intensity, reason, duration, now)
    }

    pub fn current_emotion(&self, conn: &Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<EmotionalState> {
        self.emotions.get_current(conn, owner, now)
    }

    /// How `target` would follow the current emotion, with a suggested intensity.
    pub fn emotion_compatibility(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        target: &str,
        now: DateTime<Utc>,
    ) -> Result<CompatibilityReport> {
        self.emotions.compatibility_with_current(conn, owner, target, now)
    }

    /// History over the configured window unless `hours`/`limit` are given.
    pub fn emotion_history(
        &self,
        conn: &Connection,
        owner: &OwnerKey,
        hours: Option<u32>,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<EmotionHistory> {
        self.emotions.history(
            conn,
            owner,
            hours.unwrap_or(self.emotion_defaults.history_hours),
            limit.unwrap_or(self.emotion_defaults.history_limit),
            now,
        )
    }

    // ── Personality ──────────────────────────────────────────────────────────

    pub fn adjust_trait(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        trait_name: &str,
        delta: f64,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TraitAdjustment> {
        self.personality
            .adjust_trait(conn, owner, trait_name, delta, reason, now)
    }

    /// The owner's traits as shifted by the current emotion. Nothing is persisted
    /// beyond seeding defaults for a new owner.
    pub fn mood_traits(&self, conn: &mut Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<TraitSnapshot> {
        let tx = conn.transaction()?;
        let current = self.emotions.get_current(&tx, owner, now)?;
        let snapshot = self.personality.traits_in(&tx, owner, now)?;
        tx.commit()?;
        Ok(self.personality.traits_under_mood(&snapshot, &current.emotion))
    }

    pub fn personality_summary(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        now: DateTime<Utc>,
    ) -> Result<PersonalitySummary> {
        self.personality.summary(conn, owner, now)
    }

    // ── Conversation ─────────────────────────────────────────────────────────

    /// What a character needs before replying: top conversation memories, the
    /// current emotion, mood-shifted traits and a one-week summary.
    ///
    /// Returned memories count as accessed.
    pub fn conversation_context(
        &self,
        conn: &mut Connection,
        owner: &OwnerKey,
        now: DateTime<Utc>,
    ) -> Result<ConversationContext> {
        let req = RetrieveRequest {
            memory_type: Some(MemoryType::Conversation),
            limit: CONTEXT_MEMORY_LIMIT,
            min_importance: CONTEXT_MIN_IMPORTANCE,
            ..RetrieveRequest::new(owner.clone())
        };

        let tx = conn.transaction()?;
        let recent_memories = retrieve::retrieve_in(&tx, self.extractor(), &req, now)?;
        let current_emotion = self.emotions.get_current(&tx, owner, now)?;
        let snapshot = self.personality.traits_in(&tx, owner, now)?;
        let memory_summary = stats::memory_summary(&tx, owner, CONTEXT_SUMMARY_DAYS, now)?;
        tx.commit()?;

        let mood_traits = self
            .personality
            .traits_under_mood(&snapshot, &current_emotion.emotion)
            .values();

        Ok(ConversationContext {
            recent_memories,
            current_emotion,
            mood_traits,
            memory_summary,
            timestamp: now,
        })
    }

    /// Store both sides of a turn as conversation memories and, when an emotion
    /// was detected, set it. All or nothing.
    pub fn process_conversation(
        &self,
        conn: &mut Connection,
        turn: &ConversationTurn,
        now: DateTime<Utc>,
    ) -> Result<ProcessedTurn> {
        let importance = turn.importance.unwrap_or(DEFAULT_TURN_IMPORTANCE);
        let request_for = |content: String, role: &str| StoreMemoryRequest {
            owner: turn.owner.clone(),
            content,
            memory_type: MemoryType::Conversation,
            emotion: None,
            importance: Some(importance),
            metadata: Some(turn.metadata(role)),
            direct_interaction: false,
        };
        let max_keywords = self.retrieval.max_keywords;

        let tx = conn.transaction()?;
        let user_memory = store::store_memory_in(
            &tx,
            self.extractor(),
            &request_for(turn.user_content(), "user"),
            max_keywords,
            now,
        )?;
        let character_memory = store::store_memory_in(
            &tx,
            self.extractor(),
            &request_for(turn.character_content(), "character"),
            max_keywords,
            now,
        )?;
        let emotion = match turn.detected_emotion.as_deref() {
            Some(detected) => Some(self.emotions.set_emotion_in(
                &tx,
                &turn.owner,
                detected,
                turn.emotion_intensity.unwrap_or(DEFAULT_DETECTED_INTENSITY),
                Some(&turn.trigger()),
                self.emotion_defaults.default_duration_secs,
                now,
            )?),
            None => None,
        };
        tx.commit()?;

        tracing::info!(
            owner = %turn.owner,
            turn_id = ?turn.turn_id,
            emotion = ?emotion.as_ref().map(|e| e.emotion.as_str()),
            "conversation turn processed"
        );

        Ok(ProcessedTurn {
            user_memory,
            character_memory,
            emotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 8, 8, 0, 0).unwrap()
    }

    #[test]
    fn defaults_come_from_config() {
        let mut config = AnimaConfig::default();
        config.retrieval.default_limit = 3;
        config.emotion.default_duration_secs = 120;
        let anima = Anima::new(&config);
        let owner = OwnerKey::new("u1", "airi");

        assert_eq!(anima.retrieve_request(owner.clone()).limit, 3);

        let mut conn = db::open_memory_database().unwrap();
        let state = anima
            .update_emotion(&mut conn, &owner, "calm", 0.4, None, None, now())
            .unwrap();
        assert_eq!(state.duration_secs, 120);
    }

    #[test]
    fn reasoned_adjustment_is_journaled() {
        let anima = Anima::new(&AnimaConfig::default());
        let owner = OwnerKey::new("u1", "airi");
        let mut conn = db::open_memory_database().unwrap();

        anima
            .adjust_trait(&mut conn, &owner, "curiosity", 0.1, Some("asked many questions"), now())
            .unwrap();
        anima
            .adjust_trait(&mut conn, &owner, "curiosity", 0.1, None, now())
            .unwrap();

        let req = RetrieveRequest {
            memory_type: Some(MemoryType::PersonalityChange),
            ..RetrieveRequest::new(owner)
        };
        let journal = anima.retrieve(&mut conn, &req, now()).unwrap();
        assert_eq!(journal.len(), 1);
        assert!(journal[0].content.ends_with("Reason: asked many questions"));
    }
}
