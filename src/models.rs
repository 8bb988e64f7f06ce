use serde::{Deserialize, Serialize};

// Error body shared by Gemini and OpenAI:
// {"error": {"message": "...", "type"|"status": "...", "code": ...}}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Detail(ErrorDetail),
    Message(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    pub fn message(&self) -> Option<&str> {
        match &self.error {
            ErrorPayload::Detail(detail) => detail.message.as_deref(),
            ErrorPayload::Message(message) => Some(message.as_str()),
        }
    }
}
