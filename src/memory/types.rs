//! Core memory type definitions.
//!
//! Defines [`OwnerKey`] (the user/character pair every record belongs to),
//! [`MemoryType`] (what kind of thing a memory records), and [`Memory`] (a full
//! record as stored in the `memories` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnimaError, Result};

/// Identifies whose memories, emotions and traits a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerKey {
    pub user_id: String,
    pub character: String,
}

impl OwnerKey {
    pub fn new(user_id: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            character: character.into(),
        }
    }

    /// Reject blank user or character identifiers.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(AnimaError::validation("user_id must not be empty"));
        }
        if self.character.trim().is_empty() {
            return Err(AnimaError::validation("character must not be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.character)
    }
}

/// The kinds of memory a character can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Things said in passing.
    Conversation,
    /// Something that happened.
    Event,
    /// Likes and dislikes of the user.
    Preference,
    /// Plain facts about the user or the world.
    Fact,
    /// How the user and the character relate.
    Relationship,
    /// Anniversaries and promises. Never swept.
    Milestone,
    /// Journal entry written when a personality trait was adjusted.
    PersonalityChange,
}

impl MemoryType {
    pub const ALL: [MemoryType; 7] = [
        Self::Conversation,
        Self::Event,
        Self::Preference,
        Self::Fact,
        Self::Relationship,
        Self::Milestone,
        Self::PersonalityChange,
    ];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::Event => "event",
            Self::Preference => "preference",
            Self::Fact => "fact",
            Self::Relationship => "relationship",
            Self::Milestone => "milestone",
            Self::PersonalityChange => "personality_change",
        }
    }

    /// Starting importance before content-based adjustments.
    pub fn base_importance(&self) -> f64 {
        match self {
            Self::Conversation => 0.30,
            Self::Event => 0.60,
            Self::Preference => 0.80,
            Self::Fact => 0.50,
            Self::Relationship => 0.90,
            Self::Milestone => 0.95,
            Self::PersonalityChange => 0.40,
        }
    }

    /// Maximum content length in characters.
    pub fn max_content_chars(&self) -> usize {
        match self {
            Self::Conversation => 1000,
            Self::Event => 500,
            Self::Preference => 200,
            Self::Fact => 300,
            Self::Relationship => 400,
            Self::Milestone => 500,
            Self::PersonalityChange => 500,
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown memory type: {s}"))
    }
}

/// Shortest content accepted for any memory type.
pub const MIN_CONTENT_CHARS: usize = 3;

/// Check user-supplied content: per-type bounds plus the punctuation spam heuristic.
/// Returns the trimmed content.
pub fn validate_content(content: &str, memory_type: MemoryType) -> Result<&str> {
    let trimmed = validate_bounds(content, memory_type)?;
    if trimmed.matches('!').count() > 10 || trimmed.matches('?').count() > 10 {
        return Err(AnimaError::validation("content appears to be spam"));
    }
    Ok(trimmed)
}

/// Emptiness and per-type length bounds only. Returns the trimmed content.
pub fn validate_bounds(content: &str, memory_type: MemoryType) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AnimaError::validation("content must not be empty"));
    }

    let chars = trimmed.chars().count();
    let max = memory_type.max_content_chars();
    if chars > max {
        return Err(AnimaError::Validation(format!(
            "content too long for type '{memory_type}' (max {max} characters)"
        )));
    }
    if chars < MIN_CONTENT_CHARS {
        return Err(AnimaError::validation("content too short"));
    }

    Ok(trimmed)
}

/// First `max_chars` characters of `content`, with an ellipsis when cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

/// A memory record, matching the `memories` table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    pub owner: OwnerKey,
    pub content: String,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    /// Emotion label the memory was tagged with, if any.
    pub emotion: Option<String>,
    /// Long-term significance in `[0.0, 1.0]`.
    pub importance: f64,
    pub created_at: DateTime<Utc>,
    /// Set to `created_at` on insert, then to the time of each retrieval.
    pub last_accessed: DateTime<Utc>,
    /// Number of times this memory has been returned by a retrieval.
    pub access_count: u32,
    pub metadata: Option<serde_json::Value>,
}
