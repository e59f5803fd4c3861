use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExtractKeywordsParams {
    #[schemars(description = "Text to analyze")]
    pub text: String,

    #[schemars(description = "Maximum keywords returned (default 10)")]
    pub max_keywords: Option<usize>,
}
