//! Chat-integration shapes: the context handed to a character before it
//! replies, and one processed conversation turn.
//!
//! The operations themselves live on [`crate::engine::Anima`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::emotion::EmotionalState;
use crate::memory::stats::MemorySummary;
use crate::memory::store::StoreMemoryResult;
use crate::memory::types::{Memory, OwnerKey};

/// Conversation memories included in a context.
pub const CONTEXT_MEMORY_LIMIT: usize = 5;
/// Importance floor for context memories.
pub const CONTEXT_MIN_IMPORTANCE: f64 = 0.3;
/// Summary window of a context, in days.
pub const CONTEXT_SUMMARY_DAYS: u32 = 7;

/// Importance of both turn memories unless the caller sets one.
pub const DEFAULT_TURN_IMPORTANCE: f64 = 0.4;
/// Intensity of a detected emotion unless the caller sets one.
pub const DEFAULT_DETECTED_INTENSITY: f64 = 0.5;
/// Characters of the user message kept as the emotion's context.
pub const EMOTION_TRIGGER_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct ConversationContext {
    /// Top-ranked conversation memories.
    pub recent_memories: Vec<Memory>,
    pub current_emotion: EmotionalState,
    /// Trait values with the current emotion's mood modifiers applied.
    pub mood_traits: BTreeMap<String, f64>,
    pub memory_summary: MemorySummary,
    pub timestamp: DateTime<Utc>,
}

/// One exchange between the user and the character.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub owner: OwnerKey,
    pub user_message: String,
    pub character_response: String,
    /// Importance for both stored memories. Defaults to [`DEFAULT_TURN_IMPORTANCE`].
    pub importance: Option<f64>,
    pub turn_id: Option<String>,
    pub detected_emotion: Option<String>,
    /// Defaults to [`DEFAULT_DETECTED_INTENSITY`].
    pub emotion_intensity: Option<f64>,
}

impl ConversationTurn {
    pub fn new(owner: OwnerKey, user_message: impl Into<String>, character_response: impl Into<String>) -> Self {
        Self {
            owner,
            user_message: user_message.into(),
            character_response: character_response.into(),
            importance: None,
            turn_id: None,
            detected_emotion: None,
            emotion_intensity: None,
        }
    }

    pub(crate) fn user_content(&self) -> String {
        format!("User said: {}", self.user_message)
    }

    pub(crate) fn character_content(&self) -> String {
        format!("I responded: {}", self.character_response)
    }

    pub(crate) fn metadata(&self, role: &str) -> serde_json::Value {
        serde_json::json!({"role": role, "turn_id": self.turn_id})
    }

    /// Leading characters of the user message, used as the emotion's context.
    pub(crate) fn trigger(&self) -> String {
        self.user_message.chars().take(EMOTION_TRIGGER_CHARS).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTurn {
    pub user_memory: StoreMemoryResult,
    pub character_memory: StoreMemoryResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionalState>,
}
