use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `store_memory` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreMemoryParams {
    #[schemars(description = "ID of the user the memory is about")]
    pub user_id: String,

    #[schemars(description = "Character holding the memory (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "The memory text")]
    pub content: String,

    #[schemars(
        description = "Memory type: conversation, event, preference, fact, relationship, milestone"
    )]
    pub r#type: String,

    #[schemars(description = "Emotion the memory is tagged with, e.g. 'happy'")]
    pub emotion: Option<String>,

    #[schemars(description = "Importance 0.0-1.0. Scored from the content when omitted")]
    pub importance: Option<f64>,

    #[schemars(description = "Optional JSON object stored alongside the memory")]
    pub metadata: Option<serde_json::Value>,

    #[schemars(
        description = "True when the user said this directly; adds 0.1 to automatic scoring (default false)"
    )]
    pub direct_interaction: Option<bool>,
}
