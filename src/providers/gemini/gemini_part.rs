use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::providers::gemini::GeminiInlineData;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    // Function calls, executable code and friends; carried but never inspected.
    Other(Value),
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        GeminiPart::Text { text: text.into(), thought: None }
    }

    pub fn inline(mime_type: String, data: String) -> Self {
        GeminiPart::InlineData {
            inline_data: GeminiInlineData { mime_type, data },
        }
    }
}

