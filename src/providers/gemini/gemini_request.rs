use serde::{Deserialize, Serialize};

use crate::pricing::ModelPricing;
use crate::pricing::gemini::{aspect_ratio, resolution_tier};
use crate::providers::gemini::{GeminiContent, GeminiGenerationConfig, GeminiImageConfig, GeminiPart};
use crate::providers::{parse_data_urls, ImageRequest, Role, TextRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

/// Prompt text first, then any attached images as inline data.
fn user_parts(prompt: &str, images: &[String]) -> Vec<GeminiPart> {
    let mut parts = Vec::with_capacity(images.len() + 1);
    if !prompt.trim().is_empty() {
        parts.push(GeminiPart::text(prompt));
    }
    for (mime_type, data) in parse_data_urls("gemini", images) {
        parts.push(GeminiPart::inline(mime_type, data));
    }
    parts
}

impl From<&TextRequest> for GeminiRequest {
    fn from(request: &TextRequest) -> Self {
        let mut contents: Vec<GeminiContent> = request
            .history
            .iter()
            .filter(|turn| !turn.text.trim().is_empty())
            .map(|turn| match turn.role {
                Role::User => GeminiContent::user(vec![GeminiPart::text(turn.text.as_str())]),
                Role::Assistant => GeminiContent::model(vec![GeminiPart::text(turn.text.as_str())]),
            })
            .collect();
        contents.push(GeminiContent::user(user_parts(&request.prompt, &request.images)));

        let system_instruction = request
            .system_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| GeminiContent { role: None, parts: vec![GeminiPart::text(s)] });

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                ..Default::default()
            })
        } else {
            None
        };

        GeminiRequest { contents, system_instruction, generation_config }
    }
}

impl GeminiRequest {
    pub fn for_image(request: &ImageRequest, pricing: &ModelPricing) -> Self {
        let size = request.size.as_deref();
        let image_size = if pricing.image_tiers.len() > 1 {
            resolution_tier(size).map(str::to_string)
        } else {
            None
        };
        let aspect_ratio = aspect_ratio(size).map(str::to_string);
        let image_config = if image_size.is_some() || aspect_ratio.is_some() {
            Some(GeminiImageConfig { aspect_ratio, image_size })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![GeminiContent::user(user_parts(&request.prompt, &request.images))],
            system_instruction: None,
            generation_config: Some(GeminiGenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                image_config,
                ..Default::default()
            }),
        }
    }
}
