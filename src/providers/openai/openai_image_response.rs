use serde::{Deserialize, Serialize};

use crate::providers::openai::{OpenAIImageData, OpenAIImageUsage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIImageResponse {
    #[serde(default)]
    pub created: Option<u64>,
    #[serde(default)]
    pub data: Vec<OpenAIImageData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<OpenAIImageUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dalle_response_without_usage() {
        let response: OpenAIImageResponse = serde_json::from_value(json!({
            "created": 1713833628,
            "data": [{"url": "https://example.com/img.png", "revised_prompt": "A detailed castle"}]
        }))
        .unwrap();
        assert!(response.usage.is_none());
        assert_eq!(response.data[0].revised_prompt.as_deref(), Some("A detailed castle"));
    }
}
