use serde::{Deserialize, Serialize};

use crate::providers::gemini::GeminiModalityTokens;
use crate::usage::clamp_tokens;

// Counts are signed on purpose: anything negative is clamped, not rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiUsage {
    #[serde(rename = "promptTokenCount")]
    pub prompt_token_count: Option<i64>,
    #[serde(rename = "candidatesTokenCount")]
    pub candidates_token_count: Option<i64>,
    #[serde(rename = "totalTokenCount")]
    pub total_token_count: Option<i64>,
    #[serde(rename = "thoughtsTokenCount")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<i64>,
    #[serde(rename = "promptTokensDetails")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<Vec<GeminiModalityTokens>>,
    #[serde(rename = "candidatesTokensDetails")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_tokens_details: Option<Vec<GeminiModalityTokens>>,
}

/// `(text, image)` token counts, or `None` when no per-modality details exist.
fn split_by_modality(details: &Option<Vec<GeminiModalityTokens>>) -> Option<(u64, u64)> {
    let details = details.as_ref().filter(|d| !d.is_empty())?;
    let mut text = 0u64;
    let mut image = 0u64;
    for entry in details {
        let count = clamp_tokens(entry.token_count);
        match entry.modality.as_deref().map(str::to_ascii_uppercase).as_deref() {
            Some("IMAGE") => image = image.saturating_add(count),
            // AUDIO/VIDEO/DOCUMENT are billed at the text rate
            _ => text = text.saturating_add(count),
        }
    }
    Some((text, image))
}

impl GeminiUsage {
    pub fn prompt_split(&self) -> (u64, u64) {
        split_by_modality(&self.prompt_tokens_details)
            .unwrap_or((clamp_tokens(self.prompt_token_count), 0))
    }

    /// `(text, image)` output tokens. Without details the whole candidate
    /// count goes to image output when `image_call` is set, else to text.
    pub fn candidates_split(&self, image_call: bool) -> (u64, u64) {
        split_by_modality(&self.candidates_tokens_details).unwrap_or_else(|| {
            let count = clamp_tokens(self.candidates_token_count);
            if image_call { (0, count) } else { (count, 0) }
        })
    }

    pub fn thoughts(&self) -> u64 {
        clamp_tokens(self.thoughts_token_count)
    }
}
