use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MemoryPreferencesParams {
    #[schemars(description = "ID of the user whose preferences to list")]
    pub user_id: String,

    #[schemars(description = "Character holding the memories (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "Maximum preferences returned (default 100)")]
    pub limit: Option<usize>,

    #[schemars(description = "Minimum importance 0.0-1.0 (default 0.0)")]
    pub min_importance: Option<f64>,
}
