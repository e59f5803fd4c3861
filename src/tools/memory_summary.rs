use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MemorySummaryParams {
    #[schemars(description = "ID of the user to summarize")]
    pub user_id: String,

    #[schemars(description = "Character holding the memories (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "Size of the window in days (default 30)")]
    pub days: Option<u32>,
}
