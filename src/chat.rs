//! Conversation state and provider dispatch.
//!
//! Text generation never fails from the caller's point of view: when no
//! provider can answer, a canned reply is returned and [`ChatReply::fallback`]
//! says why. Image generation has no sensible substitute, so its errors are
//! returned as-is.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::GenerationError;
use crate::fallback::canned_reply;
use crate::providers::{
    GenerationResponse, ImageRequest, Provider, Role, TextRequest, TextResponse, Turn,
};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Data URIs attached by the user or produced by the provider.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Part of an exchange answered with a canned reply; never sent upstream.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub canned: bool,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>, images: Vec<String>) -> Self {
        Self { id: Uuid::new_v4(), role, content: content.into(), images, canned: false }
    }

    fn canned(mut self, canned: bool) -> Self {
        self.canned = canned;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    NoProvider,
    NotConfigured,
    ProviderFailed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub text: String,
    /// Set when `text` is a canned reply rather than the provider's answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<TextResponse>,
}

/// Options for [`ChatService::generate_image`].
#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    pub size: Option<String>,
    pub quality: Option<String>,
    pub model: Option<String>,
    pub n: Option<u32>,
    pub images: Vec<String>,
}

pub struct ChatService {
    provider: Option<Arc<dyn Provider>>,
    system_prompt: Option<String>,
    history: Vec<ChatMessage>,
}

impl ChatService {
    pub fn new(provider: Option<Arc<dyn Provider>>, system_prompt: Option<String>) -> Self {
        Self { provider, system_prompt, history: Vec::new() }
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn usable_provider(&self) -> Result<&Arc<dyn Provider>, FallbackReason> {
        match &self.provider {
            None => Err(FallbackReason::NoProvider),
            Some(p) if !p.is_configured() => Err(FallbackReason::NotConfigured),
            Some(p) => Ok(p),
        }
    }

    fn turns(&self) -> Vec<Turn> {
        self.history
            .iter()
            .filter(|m| !m.canned)
            .map(|m| Turn { role: m.role, text: m.content.clone() })
            .collect()
    }

    pub async fn generate_response(&mut self, prompt: &str, images: Vec<String>) -> ChatReply {
        let outcome = match self.usable_provider() {
            Err(reason) => Err(reason),
            Ok(provider) => {
                let request = TextRequest {
                    prompt: prompt.to_string(),
                    system_prompt: self.system_prompt.clone(),
                    history: self.turns(),
                    images: images.clone(),
                    max_tokens: None,
                    temperature: None,
                };
                provider
                    .generate_response(&request)
                    .await
                    .map_err(|e| FallbackReason::ProviderFailed(e.to_string()))
            }
        };

        let reply = match outcome {
            Ok(response) => ChatReply { text: response.text.clone(), fallback: None, response: Some(response) },
            Err(reason) => {
                match &reason {
                    FallbackReason::ProviderFailed(message) => {
                        warn!("Provider call failed, answering with canned reply: {}", message)
                    }
                    other => info!("No usable provider ({:?}), answering with canned reply", other),
                }
                ChatReply { text: canned_reply(prompt).to_string(), fallback: Some(reason), response: None }
            }
        };

        let canned = reply.fallback.is_some();
        self.history.push(ChatMessage::new(Role::User, prompt, images).canned(canned));
        self.history
            .push(ChatMessage::new(Role::Assistant, reply.text.clone(), Vec::new()).canned(canned));
        reply
    }

    pub async fn generate_image(
        &mut self,
        prompt: &str,
        options: ImageOptions,
    ) -> Result<GenerationResponse, GenerationError> {
        let provider = self
            .usable_provider()
            .map_err(|_| GenerationError::NoProviderConfigured)?;

        let request = ImageRequest {
            prompt: prompt.to_string(),
            size: options.size,
            quality: options.quality,
            model: options.model,
            n: options.n,
            images: options.images.clone(),
        };
        let response = provider.generate_image(&request).await?;

        let produced: Vec<String> = response
            .images
            .iter()
            .filter_map(|img| match (&img.b64_json, &img.url) {
                (Some(data), _) => Some(format!(
                    "data:{};base64,{}",
                    img.mime_type.as_deref().unwrap_or("image/png"),
                    data
                )),
                (None, Some(url)) => Some(url.clone()),
                (None, None) => None,
            })
            .collect();
        let caption = response
            .metadata
            .text_response
            .clone()
            .unwrap_or_else(|| format!("Generated {} image(s).", produced.len()));

        self.history.push(ChatMessage::new(Role::User, prompt, options.images));
        self.history.push(ChatMessage::new(Role::Assistant, caption, produced));
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{GeneratedImage, GenerationMetadata};
    use crate::usage::{image_cost, text_cost, GenerationUsage, TokenRates};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const RATES: TokenRates = TokenRates { input_text: 1.0, input_image: 1.0, output_text: 1.0, output_image: 1.0 };

    struct FakeProvider {
        configured: bool,
        fail: bool,
        images: bool,
        seen_history: Mutex<Vec<usize>>,
    }

    impl FakeProvider {
        fn new(configured: bool, fail: bool, images: bool) -> Arc<Self> {
            Arc::new(Self { configured, fail, images, seen_history: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl Provider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate_response(&self, request: &TextRequest) -> Result<TextResponse, GenerationError> {
            self.seen_history.lock().unwrap().push(request.history.len());
            if self.fail {
                return Err(GenerationError::Provider {
                    provider: "fake".to_string(),
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let usage = GenerationUsage::default();
            Ok(TextResponse {
                text: format!("echo: {}", request.prompt),
                model: "fake-1".to_string(),
                usage,
                cost: text_cost(&usage, &RATES),
            })
        }

        async fn generate_image(&self, request: &ImageRequest) -> Result<GenerationResponse, GenerationError> {
            if !self.images {
                return Err(GenerationError::unsupported(self.name(), "image generation"));
            }
            let usage = GenerationUsage::default();
            Ok(GenerationResponse {
                images: vec![GeneratedImage {
                    b64_json: Some("AAAA".to_string()),
                    url: None,
                    mime_type: Some("image/webp".to_string()),
                    revised_prompt: None,
                }],
                metadata: GenerationMetadata {
                    provider: "fake".to_string(),
                    model: "fake-image".to_string(),
                    usage,
                    cost: image_cost(&usage, &RATES, 0.01, 1),
                    text_response: Some(format!("Here is {}", request.prompt)),
                },
            })
        }
    }

    #[tokio::test]
    async fn test_configured_provider_answers_and_sees_history() {
        let fake = FakeProvider::new(true, false, true);
        let mut chat = ChatService::new(Some(fake.clone()), None);

        let first = chat.generate_response("hello", vec![]).await;
        assert_eq!(first.text, "echo: hello");
        assert!(first.fallback.is_none());
        assert_eq!(first.response.unwrap().model, "fake-1");

        chat.generate_response("again", vec![]).await;
        assert_eq!(*fake.seen_history.lock().unwrap(), vec![0, 2]);
        assert_eq!(chat.history().len(), 4);
        assert_eq!(chat.history()[3].content, "echo: again");
        assert!(!chat.history()[3].canned);
        assert!(serde_json::to_value(&chat.history()[3]).unwrap().get("canned").is_none());
    }

    #[tokio::test]
    async fn test_no_provider_falls_back() {
        let mut chat = ChatService::new(None, None);
        let reply = chat.generate_response("draw a character", vec![]).await;
        assert_eq!(reply.fallback, Some(FallbackReason::NoProvider));
        assert_eq!(reply.text, canned_reply("draw a character"));
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn test_canned_exchanges_are_not_sent_as_context() {
        let fake = FakeProvider::new(true, true, true);
        let mut chat = ChatService::new(Some(fake.clone()), None);

        chat.generate_response("a background", vec![]).await;
        chat.generate_response("a texture", vec![]).await;
        assert_eq!(chat.history().len(), 4);
        assert!(chat.history().iter().all(|m| m.canned));
        assert!(chat.turns().is_empty());
        assert_eq!(*fake.seen_history.lock().unwrap(), vec![0, 0]);

        let json = serde_json::to_value(&chat.history()[1]).unwrap();
        assert_eq!(json["canned"], true);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_not_called() {
        let fake = FakeProvider::new(false, false, true);
        let mut chat = ChatService::new(Some(fake.clone()), None);
        let reply = chat.generate_response("texture", vec![]).await;
        assert_eq!(reply.fallback, Some(FallbackReason::NotConfigured));
        assert!(fake.seen_history.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_swallowed_but_reported() {
        let fake = FakeProvider::new(true, true, true);
        let mut chat = ChatService::new(Some(fake), None);
        let reply = chat.generate_response("a UI mockup", vec![]).await;
        assert_eq!(reply.text, canned_reply("a UI mockup"));
        match reply.fallback {
            Some(FallbackReason::ProviderFailed(message)) => assert!(message.contains("boom")),
            other => panic!("unexpected fallback: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_image_without_provider() {
        let mut chat = ChatService::new(None, None);
        let err = chat.generate_image("castle", ImageOptions::default()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NoProviderConfigured));

        let mut chat = ChatService::new(Some(FakeProvider::new(false, false, true)), None);
        let err = chat.generate_image("castle", ImageOptions::default()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NoProviderConfigured));
        assert!(chat.history().is_empty());
    }

    #[tokio::test]
    async fn test_generate_image_unsupported_propagates() {
        let mut chat = ChatService::new(Some(FakeProvider::new(true, false, false)), None);
        let err = chat.generate_image("castle", ImageOptions::default()).await.unwrap_err();
        assert!(matches!(err, GenerationError::UnsupportedOperation { .. }));
        assert!(chat.history().is_empty());
    }

    #[tokio::test]
    async fn test_generate_image_records_history() {
        let mut chat = ChatService::new(Some(FakeProvider::new(true, false, true)), None);
        let response = chat.generate_image("castle", ImageOptions::default()).await.unwrap();
        assert_eq!(response.images.len(), 1);

        let history = chat.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "Here is castle");
        assert_eq!(history[1].images, vec!["data:image/webp;base64,AAAA".to_string()]);

        chat.clear_history();
        assert!(chat.history().is_empty());
        assert_eq!(chat.provider_name(), Some("fake"));
    }

    #[test]
    fn test_fallback_reason_serialization() {
        let json = serde_json::to_value(FallbackReason::ProviderFailed("boom".to_string())).unwrap();
        assert_eq!(json["reason"], "provider_failed");
        assert_eq!(json["detail"], "boom");
        let json = serde_json::to_value(FallbackReason::NoProvider).unwrap();
        assert_eq!(json["reason"], "no_provider");
    }
}
