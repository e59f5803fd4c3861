//! Parameters for the chat-integration tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConversationContextParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character about to reply (defaults to the configured character)")]
    pub character: Option<String>,
}

/// Parameters for `process_conversation`.
///
/// Both messages are stored as conversation memories; a detected emotion is
/// set with the start of the user message as its context.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ProcessConversationParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character that replied (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "What the user said")]
    pub user_message: String,

    #[schemars(description = "What the character replied")]
    pub character_response: String,

    #[schemars(description = "Importance 0.0-1.0 for both memories (default 0.4)")]
    pub importance: Option<f64>,

    #[schemars(description = "Caller's identifier for this turn, kept in memory metadata")]
    pub turn_id: Option<String>,

    #[schemars(description = "Emotion detected in the exchange, e.g. 'happy'")]
    pub detected_emotion: Option<String>,

    #[schemars(description = "Intensity 0.0-1.0 of the detected emotion (default 0.5)")]
    pub emotion_intensity: Option<f64>,
}
