//! Buckets preference memories by topic.
//!
//! Matching is by lower-cased substring against fixed keyword lists, checked in
//! a fixed order: food, then animals and activities (both land in
//! `activities`), then personality, then relationships. Anything left over is
//! `other`.

use serde::Serialize;

use crate::memory::types::Memory;

/// Default cap on preferences returned by a categorized read.
pub const DEFAULT_PREFERENCE_LIMIT: usize = 100;

const FOOD: &[&str] = &[
    "food", "eat", "eating", "drink", "drinking", "taste", "flavor", "delicious", "yummy",
    "chocolate", "ice cream", "pizza", "burger", "sushi", "pasta", "bread", "cake", "coffee",
    "tea", "juice", "water", "milk", "wine", "beer", "fruit", "vegetable", "meat", "chicken",
    "beef", "fish", "rice", "noodles", "soup", "salad", "sandwich", "cookie", "candy", "sweet",
    "dessert", "snack", "meal", "breakfast", "lunch", "dinner",
];

const ANIMALS: &[&str] = &[
    "cat", "cats", "dog", "dogs", "pet", "pets", "animal", "animals", "bird", "birds", "fish",
    "rabbit", "hamster", "turtle", "snake", "horse", "cow", "pig", "sheep",
];

const ACTIVITIES: &[&str] = &[
    "like", "likes", "love", "loves", "enjoy", "enjoys", "hate", "hates", "dislike", "dislikes",
    "prefer", "prefers", "favorite", "favourite", "hobby", "hobbies", "activity", "activities",
    "sport", "sports", "game", "games", "music", "movie", "movies", "book", "books", "reading",
    "watching", "playing", "listening", "dancing", "singing", "cooking", "shopping", "traveling",
    "swimming", "running", "exercise", "workout",
];

const PERSONALITY: &[&str] = &["personality", "trait", "behavior", "character", "mood", "feeling"];

const RELATIONSHIPS: &[&str] = &[
    "friend", "friends", "family", "relationship", "relationships", "dating", "romance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceCategory {
    Food,
    Activities,
    Personality,
    Relationships,
    Other,
}

impl PreferenceCategory {
    /// First matching bucket for `content`.
    pub fn classify(content: &str) -> Self {
        let content = content.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| content.contains(w));

        if mentions(FOOD) {
            Self::Food
        } else if mentions(ANIMALS) || mentions(ACTIVITIES) {
            Self::Activities
        } else if mentions(PERSONALITY) {
            Self::Personality
        } else if mentions(RELATIONSHIPS) {
            Self::Relationships
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizedPreferences {
    pub food: Vec<Memory>,
    pub activities: Vec<Memory>,
    pub personality: Vec<Memory>,
    pub relationships: Vec<Memory>,
    pub other: Vec<Memory>,
}

impl CategorizedPreferences {
    fn bucket_mut(&mut self, category: PreferenceCategory) -> &mut Vec<Memory> {
        match category {
            PreferenceCategory::Food => &mut self.food,
            PreferenceCategory::Activities => &mut self.activities,
            PreferenceCategory::Personality => &mut self.personality,
            PreferenceCategory::Relationships => &mut self.relationships,
            PreferenceCategory::Other => &mut self.other,
        }
    }
}

/// Preferences in rank order plus the same records bucketed by topic.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceReport {
    pub total_count: usize,
    pub all: Vec<Memory>,
    pub categorized: CategorizedPreferences,
}

/// Bucket `preferences`, keeping their order within each bucket.
pub fn categorize(preferences: Vec<Memory>) -> PreferenceReport {
    let mut categorized = CategorizedPreferences::default();
    for memory in &preferences {
        categorized
            .bucket_mut(PreferenceCategory::classify(&memory.content))
            .push(memory.clone());
    }
    PreferenceReport {
        total_count: preferences.len(),
        all: preferences,
        categorized,
    }
}
