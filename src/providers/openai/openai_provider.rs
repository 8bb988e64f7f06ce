use async_trait::async_trait;
use tracing::{debug, info, warn, Instrument};

use crate::config::ProviderSettings;
use crate::error::GenerationError;
use crate::llm_client::{ApiAuth, LlmClient};
use crate::pricing::openai::{self as pricing, accepts_quality, effective_quality, effective_size};
use crate::providers::openai::{OpenAIImageRequest, OpenAIImageResponse, OpenAIRequest, OpenAIResponse};
use crate::providers::{
    key_matches, GeneratedImage, GenerationMetadata, GenerationResponse, ImageRequest, Provider,
    TextRequest, TextResponse,
};
use crate::request_id::RequestId;
use crate::usage::{estimate_prompt_tokens, image_cost, text_cost, GenerationUsage};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const KEY_PREFIX: &str = "sk-";

#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    api_key: String,
    api_base: String,
    text_model: String,
    image_model: String,
    client: LlmClient,
}

impl OpenAIProvider {
    pub fn new(settings: &ProviderSettings, client: LlmClient) -> Self {
        Self {
            api_key: settings.resolved_api_key("OPENAI_API_KEY"),
            api_base: settings.api_base.clone().unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            text_model: settings
                .text_model
                .clone()
                .unwrap_or_else(|| pricing::DEFAULT_TEXT_MODEL.to_string()),
            image_model: settings
                .image_model
                .clone()
                .unwrap_or_else(|| pricing::DEFAULT_IMAGE_MODEL.to_string()),
            client,
        }
    }

    async fn chat(&self, request: &TextRequest, request_id: &RequestId) -> Result<TextResponse, GenerationError> {
        let body = OpenAIRequest::chat(&self.text_model, request);
        let url = LlmClient::join_url(&self.api_base, "chat/completions");
        let response: OpenAIResponse = self
            .client
            .post_json(self.name(), &url, ApiAuth::Bearer(&self.api_key), &body, request_id)
            .await?;

        let text = response.text().unwrap_or_else(|| {
            warn!("OpenAI returned no message content");
            String::new()
        });
        let usage = match &response.usage {
            Some(usage) => GenerationUsage::from(usage),
            None => GenerationUsage {
                input_text_tokens: estimate_prompt_tokens(&request.prompt),
                output_text_tokens: estimate_prompt_tokens(&text),
                ..Default::default()
            }
            .with_total(None),
        };
        let cost = text_cost(&usage, &pricing::text_pricing(&self.text_model).rates);
        debug!("openai text usage: {:?}, cost: {}", usage, cost.total_cost);

        Ok(TextResponse {
            text,
            model: response.model.clone().unwrap_or_else(|| self.text_model.clone()),
            usage,
            cost,
        })
    }

    async fn images(&self, request: &ImageRequest, request_id: &RequestId) -> Result<GenerationResponse, GenerationError> {
        let model = request.model.clone().unwrap_or_else(|| self.image_model.clone());
        let model_pricing = pricing::image_pricing(&model);
        let quality = effective_quality(model_pricing, request.quality.as_deref());
        let size = effective_size(model_pricing, request.size.as_deref());
        if !request.images.is_empty() {
            warn!("images/generations takes no reference images; ignoring {}", request.images.len());
        }

        let body = OpenAIImageRequest {
            model: model.clone(),
            prompt: request.prompt.clone(),
            n: request.count(),
            size: size.to_string(),
            quality: accepts_quality(&model).then(|| quality.to_string()),
            response_format: model.starts_with("dall-e").then(|| "b64_json".to_string()),
        };
        let url = LlmClient::join_url(&self.api_base, "images/generations");
        let response: OpenAIImageResponse = self
            .client
            .post_json(self.name(), &url, ApiAuth::Bearer(&self.api_key), &body, request_id)
            .await?;

        let images: Vec<GeneratedImage> = response
            .data
            .iter()
            .map(|d| GeneratedImage {
                b64_json: d.b64_json.clone(),
                url: d.url.clone(),
                mime_type: d.b64_json.as_ref().map(|_| "image/png".to_string()),
                revised_prompt: d.revised_prompt.clone(),
            })
            .collect();
        let image_count = u32::try_from(images.len()).unwrap_or(u32::MAX);

        let (per_image, standard_tokens) = model_pricing
            .image_tier(quality, size)
            .map(|t| (t.per_image, t.output_tokens))
            .unwrap_or((0.0, 0));
        let usage = match &response.usage {
            Some(usage) => GenerationUsage::from(usage),
            None => GenerationUsage {
                input_text_tokens: estimate_prompt_tokens(&request.prompt),
                output_image_tokens: standard_tokens.saturating_mul(u64::from(image_count)),
                ..Default::default()
            }
            .with_total(None),
        };
        let cost = image_cost(&usage, &model_pricing.rates, per_image, image_count);
        info!(
            "openai generated {} image(s) at {} {}, total cost ${:.4} (token {:.4} / per-image {:.4})",
            image_count,
            quality,
            size,
            cost.total_cost,
            cost.breakdown.token_based_cost,
            cost.breakdown.quality_based_cost.unwrap_or_default()
        );

        Ok(GenerationResponse {
            images,
            metadata: GenerationMetadata {
                provider: self.name().to_string(),
                model,
                usage,
                cost,
                text_response: None,
            },
        })
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        key_matches(&self.api_key, KEY_PREFIX)
    }

    async fn generate_response(&self, request: &TextRequest) -> Result<TextResponse, GenerationError> {
        let request_id = RequestId::new();
        let span = request_id.span(self.name(), "text");
        self.chat(request, &request_id).instrument(span).await
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<GenerationResponse, GenerationError> {
        let request_id = RequestId::new();
        let span = request_id.span(self.name(), "image");
        self.images(request, &request_id).instrument(span).await
    }
}
