use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Only the dall-e models accept this; gpt-image always returns base64.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}
