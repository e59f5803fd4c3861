use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RetrieveMemoriesParams {
    #[schemars(description = "ID of the user whose memories to retrieve")]
    pub user_id: String,

    #[schemars(description = "Character holding the memories (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "Optional text; results are re-ranked by keyword overlap with it")]
    pub query: Option<String>,

    #[schemars(description = "Only return memories of this type")]
    pub r#type: Option<String>,

    #[schemars(description = "Maximum number of memories to return (default 10)")]
    pub limit: Option<usize>,

    #[schemars(description = "Skip memories below this importance (default 0.0)")]
    pub min_importance: Option<f64>,
}
