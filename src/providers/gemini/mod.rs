pub mod gemini_candidate;
pub mod gemini_content;
pub mod gemini_generation_config;
pub mod gemini_image_config;
pub mod gemini_inline_data;
pub mod gemini_modality_tokens;
pub mod gemini_part;
pub mod gemini_prompt_feedback;
pub mod gemini_provider;
pub mod gemini_request;
pub mod gemini_response;
pub mod gemini_usage;

pub use gemini_candidate::GeminiCandidate;
pub use gemini_content::GeminiContent;
pub use gemini_generation_config::GeminiGenerationConfig;
pub use gemini_image_config::GeminiImageConfig;
pub use gemini_inline_data::GeminiInlineData;
pub use gemini_modality_tokens::GeminiModalityTokens;
pub use gemini_part::GeminiPart;
pub use gemini_prompt_feedback::GeminiPromptFeedback;
pub use gemini_provider::GeminiProvider;
pub use gemini_request::GeminiRequest;
pub use gemini_response::GeminiResponse;
pub use gemini_usage::GeminiUsage;
