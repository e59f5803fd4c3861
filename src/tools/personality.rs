//! Parameters for the personality tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AdjustTraitParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character whose trait changes (defaults to the configured character)")]
    pub character: Option<String>,

    #[schemars(description = "Trait name, e.g. 'cheerfulness', 'curiosity'")]
    pub trait_name: String,

    #[schemars(description = "Signed change; the result is clamped to 0.0-1.0")]
    pub adjustment: f64,

    #[schemars(description = "Why the trait changed. When given, a journal memory is written")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PersonalitySummaryParams {
    #[schemars(description = "ID of the user the character is talking to")]
    pub user_id: String,

    #[schemars(description = "Character to describe (defaults to the configured character)")]
    pub character: Option<String>,
}
