//! Parameters for the emotion tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for `update_emotion`.
///
/// With `transition` set, the new state is scored against the current one
/// and the response carries the score and the previous state.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateEmotionParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character whose emotion changes (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "Emotion label, e.g. 'happy', 'anxious', 'love'")]
    pub emotion: String,

    #[schemars(description = "Intensity 0.0-1.0")]
    pub intensity: f64,

    #[schemars(description = "What caused the emotion")]
    pub context: Option<String>,

    #[schemars(description = "How long the emotion lasts, in seconds (default 3600)")]
    pub duration_secs: Option<u64>,

    #[schemars(description = "If true, score the change against the current emotion")]
    pub transition: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CurrentEmotionParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character to read (defaults to the configured character)")]
    pub character: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmotionHistoryParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character to read (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "Window size in hours (default 24)")]
    pub hours: Option<u32>,

    #[schemars(description = "Maximum number of states returned (default 50)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmotionCompatibilityParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character to read (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "Emotion the character might move to")]
    pub target_emotion: String,
}
