pub mod openai_choice;
pub mod openai_content;
pub mod openai_content_item;
pub mod openai_image_data;
pub mod openai_image_request;
pub mod openai_image_response;
pub mod openai_image_token_details;
pub mod openai_image_url;
pub mod openai_image_usage;
pub mod openai_message;
pub mod openai_prompt_tokens_details;
pub mod openai_provider;
pub mod openai_request;
pub mod openai_response;
pub mod openai_response_message;
pub mod openai_usage;

pub use openai_choice::OpenAIChoice;
pub use openai_content::OpenAIContent;
pub use openai_content_item::OpenAIContentItem;
pub use openai_image_data::OpenAIImageData;
pub use openai_image_request::OpenAIImageRequest;
pub use openai_image_response::OpenAIImageResponse;
pub use openai_image_token_details::OpenAIImageTokenDetails;
pub use openai_image_url::OpenAIImageUrl;
pub use openai_image_usage::OpenAIImageUsage;
pub use openai_message::OpenAIMessage;
pub use openai_prompt_tokens_details::OpenAIPromptTokensDetails;
pub use openai_provider::OpenAIProvider;
pub use openai_request::OpenAIRequest;
pub use openai_response::OpenAIResponse;
pub use openai_response_message::OpenAIResponseMessage;
pub use openai_usage::OpenAIUsage;
