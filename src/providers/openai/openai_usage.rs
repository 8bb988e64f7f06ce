use serde::{Deserialize, Serialize};

use crate::providers::openai::OpenAIPromptTokensDetails;
use crate::usage::{clamp_tokens, GenerationUsage};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: Option<i64>,
    pub completion_tokens: Option<i64>,
    pub total_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<OpenAIPromptTokensDetails>,
}

impl From<&OpenAIUsage> for GenerationUsage {
    fn from(usage: &OpenAIUsage) -> Self {
        let prompt = clamp_tokens(usage.prompt_tokens);
        let image = usage
            .prompt_tokens_details
            .as_ref()
            .map(|d| clamp_tokens(d.image_tokens))
            .unwrap_or(0)
            .min(prompt);
        GenerationUsage {
            input_text_tokens: prompt - image,
            input_image_tokens: image,
            output_text_tokens: clamp_tokens(usage.completion_tokens),
            output_image_tokens: 0,
            total_tokens: 0,
        }
        .with_total(usage.total_tokens)
    }
}
