use serde::{Deserialize, Serialize};

use crate::providers::openai::{OpenAIChoice, OpenAIUsage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<OpenAIUsage>,
}

impl OpenAIResponse {
    /// First choice's content, or its refusal text.
    pub fn text(&self) -> Option<String> {
        let message = &self.choices.first()?.message;
        message
            .content
            .as_deref()
            .or(message.refusal.as_deref())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_chat_completion() {
        let response: OpenAIResponse = serde_json::from_value(json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1757841257,
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Use a 16-color palette."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 7, "total_tokens": 27}
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Use a 16-color palette."));
        assert_eq!(response.model.as_deref(), Some("gpt-4o-2024-08-06"));
    }

    #[test]
    fn test_refusal_and_empty_choices() {
        let response: OpenAIResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null, "refusal": "I can't help with that."}}]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("I can't help with that."));

        let empty: OpenAIResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(empty.text(), None);
    }
}
