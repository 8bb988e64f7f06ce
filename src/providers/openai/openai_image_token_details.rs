use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIImageTokenDetails {
    pub text_tokens: Option<i64>,
    pub image_tokens: Option<i64>,
}
