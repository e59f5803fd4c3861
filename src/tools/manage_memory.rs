//! Parameters for the tools that change or remove a single memory.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteMemoryParams {
    #[schemars(description = "ID of the memory to delete")]
    pub id: String,

    #[schemars(description = "Why the memory is being removed (kept in the audit log)")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateImportanceParams {
    #[schemars(description = "ID of the memory to update")]
    pub id: String,

    #[schemars(description = "New importance, 0.0-1.0")]
    pub importance: f64,
}
