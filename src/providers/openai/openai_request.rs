use serde::{Deserialize, Serialize};

use crate::providers::openai::{OpenAIContent, OpenAIContentItem, OpenAIImageUrl, OpenAIMessage};
use crate::providers::{parse_data_urls, Role, TextRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl OpenAIRequest {
    pub fn chat(model: &str, request: &TextRequest) -> Self {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        if let Some(system) = request.system_prompt.as_deref().filter(|s| !s.trim().is_empty()) {
            messages.push(OpenAIMessage::text("system", system));
        }
        for turn in request.history.iter().filter(|t| !t.text.trim().is_empty()) {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(OpenAIMessage::text(role, turn.text.as_str()));
        }

        // Only data URIs that actually parse are forwarded.
        let images: Vec<String> = parse_data_urls("openai", &request.images)
            .into_iter()
            .map(|(mime, data)| format!("data:{};base64,{}", mime, data))
            .collect();
        let content = if images.is_empty() {
            OpenAIContent::Text(request.prompt.clone())
        } else {
            let mut items = vec![OpenAIContentItem {
                r#type: "text".to_string(),
                text: Some(request.prompt.clone()),
                image_url: None,
            }];
            items.extend(images.into_iter().map(|url| OpenAIContentItem {
                r#type: "image_url".to_string(),
                text: None,
                image_url: Some(OpenAIImageUrl { url }),
            }));
            OpenAIContent::Array(items)
        };
        messages.push(OpenAIMessage { role: "user".to_string(), content });

        OpenAIRequest {
            model: model.to_string(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}
