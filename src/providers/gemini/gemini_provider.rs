use async_trait::async_trait;
use tracing::{debug, info, warn, Instrument};

use crate::config::ProviderSettings;
use crate::error::GenerationError;
use crate::llm_client::{ApiAuth, LlmClient};
use crate::pricing::gemini::{self as pricing, STANDARD_QUALITY};
use crate::providers::gemini::{GeminiRequest, GeminiResponse};
use crate::providers::{
    key_matches, GeneratedImage, GenerationMetadata, GenerationResponse, ImageRequest, Provider,
    TextRequest, TextResponse,
};
use crate::request_id::RequestId;
use crate::usage::{estimate_prompt_tokens, image_cost, text_cost, GenerationUsage};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const KEY_PREFIX: &str = "AIza";

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_key: String,
    api_base: String,
    text_model: String,
    image_model: String,
    client: LlmClient,
}

impl GeminiProvider {
    pub fn new(settings: &ProviderSettings, client: LlmClient) -> Self {
        Self {
            api_key: settings.resolved_api_key("GEMINI_API_KEY"),
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

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        LlmClient::join_url(&self.api_base, &format!("models/{}:generateContent", model))
    }

    async fn call(&self, model: &str, body: &GeminiRequest, request_id: &RequestId) -> Result<GeminiResponse, GenerationError> {
        self.client
            .post_json(self.name(), &self.endpoint(model), ApiAuth::QueryKey(&self.api_key), body, request_id)
            .await
    }
}

/// Normalize Gemini usage metadata for an image call.
///
/// Without metadata, input is estimated from the prompt and output from the
/// tier's standard per-image token count.
pub fn image_usage(
    response: &GeminiResponse,
    prompt: &str,
    standard_image_tokens: u64,
    image_count: u32,
) -> GenerationUsage {
    match &response.usage_metadata {
        Some(meta) => {
            let (input_text_tokens, input_image_tokens) = meta.prompt_split();
            let (output_text, output_image_tokens) = meta.candidates_split(true);
            GenerationUsage {
                input_text_tokens,
                input_image_tokens,
                output_text_tokens: output_text.saturating_add(meta.thoughts()),
                output_image_tokens,
                total_tokens: 0,
            }
            .with_total(meta.total_token_count)
        }
        None => GenerationUsage {
            input_text_tokens: estimate_prompt_tokens(prompt),
            output_image_tokens: standard_image_tokens.saturating_mul(u64::from(image_count)),
            ..Default::default()
        }
        .with_total(None),
    }
}

pub fn text_usage(response: &GeminiResponse, prompt: &str) -> GenerationUsage {
    match &response.usage_metadata {
        Some(meta) => {
            let (input_text_tokens, input_image_tokens) = meta.prompt_split();
            let (output_text, output_image_tokens) = meta.candidates_split(false);
            GenerationUsage {
                input_text_tokens,
                input_image_tokens,
                output_text_tokens: output_text.saturating_add(meta.thoughts()),
                output_image_tokens,
                total_tokens: 0,
            }
            .with_total(meta.total_token_count)
        }
        None => GenerationUsage {
            input_text_tokens: estimate_prompt_tokens(prompt),
            output_text_tokens: response.text().as_deref().map(estimate_prompt_tokens).unwrap_or(0),
            ..Default::default()
        }
        .with_total(None),
    }
}

impl GeminiProvider {
    async fn text(&self, request: &TextRequest, request_id: &RequestId) -> Result<TextResponse, GenerationError> {
        let body = GeminiRequest::from(request);
        let response = self.call(&self.text_model, &body, request_id).await?;

        let text = match response.text() {
            Some(text) => text,
            None => {
                warn!("Gemini returned no text (block reason: {:?})", response.block_reason());
                String::new()
            }
        };
        let usage = text_usage(&response, &request.prompt);
        let cost = text_cost(&usage, &pricing::text_pricing(&self.text_model).rates);
        debug!("gemini text usage: {:?}, cost: {}", usage, cost.total_cost);

        Ok(TextResponse {
            text,
            model: response.model_version.clone().unwrap_or_else(|| self.text_model.clone()),
            usage,
            cost,
        })
    }

    async fn image(&self, request: &ImageRequest, request_id: &RequestId) -> Result<GenerationResponse, GenerationError> {
        let model = request.model.clone().unwrap_or_else(|| self.image_model.clone());
        let model_pricing = pricing::image_pricing(&model);
        if request.count() > 1 {
            debug!("Gemini returns one image per call; ignoring n={}", request.count());
        }

        let body = GeminiRequest::for_image(request, model_pricing);
        let response = self.call(&model, &body, request_id).await?;

        let images: Vec<GeneratedImage> = response
            .inline_images()
            .into_iter()
            .map(|inline| GeneratedImage {
                b64_json: Some(inline.data.clone()),
                url: None,
                mime_type: Some(inline.mime_type.clone()),
                revised_prompt: None,
            })
            .collect();
        if images.is_empty() {
            warn!("Gemini returned no image (block reason: {:?})", response.block_reason());
        }
        let image_count = u32::try_from(images.len()).unwrap_or(u32::MAX);

        let size = pricing::resolution_tier(request.size.as_deref()).unwrap_or(model_pricing.default_size);
        let (per_image, standard_tokens) = model_pricing
            .image_tier(STANDARD_QUALITY, size)
            .map(|t| (t.per_image, t.output_tokens))
            .unwrap_or((0.0, 0));

        let usage = image_usage(&response, &request.prompt, standard_tokens, image_count);
        let cost = image_cost(&usage, &model_pricing.rates, per_image, image_count);
        info!(
            "gemini generated {} image(s), total cost ${:.4} (token {:.4} / per-image {:.4})",
            image_count,
            cost.total_cost,
            cost.breakdown.token_based_cost,
            cost.breakdown.quality_based_cost.unwrap_or_default()
        );

        Ok(GenerationResponse {
            images,
            metadata: GenerationMetadata {
                provider: self.name().to_string(),
                model: response.model_version.clone().unwrap_or(model),
                usage,
                cost,
                text_response: response.text(),
            },
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        key_matches(&self.api_key, KEY_PREFIX)
    }

    async fn generate_response(&self, request: &TextRequest) -> Result<TextResponse, GenerationError> {
        let request_id = RequestId::new();
        let span = request_id.span(self.name(), "text");
        self.text(request, &request_id).instrument(span).await
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<GenerationResponse, GenerationError> {
        let request_id = RequestId::new();
        let span = request_id.span(self.name(), "image");
        self.image(request, &request_id).instrument(span).await
    }
}
