use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiModalityTokens {
    pub modality: Option<String>,
    #[serde(rename = "tokenCount")]
    pub token_count: Option<i64>,
}
