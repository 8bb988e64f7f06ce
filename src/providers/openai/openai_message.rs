use serde::{Deserialize, Serialize};

use crate::providers::openai::OpenAIContent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: OpenAIContent,
}

impl OpenAIMessage {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self { role: role.to_string(), content: OpenAIContent::Text(text.into()) }
    }
}
