pub mod gemini;
pub mod openai;

use crate::config::{Config, ProviderKind, ProviderSettings};
use crate::error::GenerationError;
use crate::llm_client::LlmClient;
use crate::usage::{GenerationCost, GenerationUsage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A prior conversation turn handed to the provider for context.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct TextRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub history: Vec<Turn>,
    /// Data URIs (`data:image/png;base64,...`).
    pub images: Vec<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextResponse {
    pub text: String,
    pub model: String,
    pub usage: GenerationUsage,
    pub cost: GenerationCost,
}

#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: Option<String>,
    pub quality: Option<String>,
    pub model: Option<String>,
    pub n: Option<u32>,
    /// Reference images as data URIs.
    pub images: Vec<String>,
}

impl ImageRequest {
    pub fn count(&self) -> u32 {
        self.n.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub provider: String,
    pub model: String,
    pub usage: GenerationUsage,
    pub cost: GenerationCost,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_response: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub images: Vec<GeneratedImage>,
    pub metadata: GenerationMetadata,
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Key present and shaped like the vendor's keys. Never touches the network.
    fn is_configured(&self) -> bool;

    async fn generate_response(&self, request: &TextRequest) -> Result<TextResponse, GenerationError>;

    async fn generate_image(&self, _request: &ImageRequest) -> Result<GenerationResponse, GenerationError> {
        Err(GenerationError::unsupported(self.name(), "image generation"))
    }
}

pub(crate) fn key_matches(api_key: &str, prefix: &str) -> bool {
    let key = api_key.trim();
    !key.is_empty() && key.starts_with(prefix)
}

/// Split `data:<mime>;base64,<data>` into `(mime, data)`.
pub(crate) fn parse_data_url(url: &str) -> Option<(String, String)> {
    let rest = url.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mut header_parts = header.split(';');
    let mime_type = header_parts.next()?.to_string();
    if mime_type.is_empty() || data.is_empty() {
        return None;
    }
    if header_parts.any(|p| p.eq_ignore_ascii_case("base64")) {
        Some((mime_type, data.to_string()))
    } else {
        None
    }
}

pub(crate) fn parse_data_urls(provider: &str, urls: &[String]) -> Vec<(String, String)> {
    urls.iter()
        .filter_map(|url| {
            let parsed = parse_data_url(url);
            if parsed.is_none() {
                warn!("{}: skipping image that is not a base64 data URI", provider);
            }
            parsed
        })
        .collect()
}

/// Build the provider named by the config, or the first one with a usable key.
///
/// An explicitly chosen provider is built even without its own section, so
/// its key can come from the environment.
pub fn create_provider(config: &Config, llm_client: LlmClient) -> Option<Arc<dyn Provider>> {
    let gemini = |s: &ProviderSettings| {
        Arc::new(GeminiProvider::new(s, llm_client.clone())) as Arc<dyn Provider>
    };
    let openai = |s: &ProviderSettings| {
        Arc::new(OpenAIProvider::new(s, llm_client.clone())) as Arc<dyn Provider>
    };
    let defaults = ProviderSettings::default();

    let chosen = match config.provider {
        Some(ProviderKind::Gemini) => Some(gemini(config.gemini.as_ref().unwrap_or(&defaults))),
        Some(ProviderKind::OpenAI) => Some(openai(config.openai.as_ref().unwrap_or(&defaults))),
        None => [config.gemini.as_ref().map(gemini), config.openai.as_ref().map(openai)]
            .into_iter()
            .flatten()
            .find(|p| p.is_configured()),
    };
    match &chosen {
        Some(p) => debug!("Using provider {} (configured: {})", p.name(), p.is_configured()),
        None => debug!("No provider available"),
    }
    chosen
}
