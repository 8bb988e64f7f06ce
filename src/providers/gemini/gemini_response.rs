use serde::{Deserialize, Serialize};

use crate::providers::gemini::{
    GeminiCandidate, GeminiInlineData, GeminiPart, GeminiPromptFeedback, GeminiUsage,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<GeminiUsage>,
    #[serde(rename = "modelVersion")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(rename = "promptFeedback")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

impl GeminiResponse {
    fn parts(&self) -> impl Iterator<Item = &GeminiPart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
    }

    /// Visible text, thought parts excluded. `None` when there is none.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts()
            .filter_map(|part| match part {
                GeminiPart::Text { text, thought } if *thought != Some(true) => Some(text.as_str()),
                _ => None,
            })
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if texts.is_empty() { None } else { Some(texts.join("\n")) }
    }

    pub fn inline_images(&self) -> Vec<&GeminiInlineData> {
        self.parts()
            .filter_map(|part| match part {
                GeminiPart::InlineData { inline_data } => Some(inline_data),
                _ => None,
            })
            .collect()
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref())
    }
}
