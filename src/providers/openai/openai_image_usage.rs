use serde::{Deserialize, Serialize};

use crate::providers::openai::OpenAIImageTokenDetails;
use crate::usage::{clamp_tokens, GenerationUsage};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIImageUsage {
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub total_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens_details: Option<OpenAIImageTokenDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens_details: Option<OpenAIImageTokenDetails>,
    // Flat form some gateways report instead of output_tokens_details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_output_tokens: Option<i64>,
}

impl From<&OpenAIImageUsage> for GenerationUsage {
    fn from(usage: &OpenAIImageUsage) -> Self {
        let (input_text_tokens, input_image_tokens) = match &usage.input_tokens_details {
            Some(d) if d.text_tokens.is_some() || d.image_tokens.is_some() => {
                (clamp_tokens(d.text_tokens), clamp_tokens(d.image_tokens))
            }
            _ => (clamp_tokens(usage.input_tokens), 0),
        };

        let detailed = usage
            .output_tokens_details
            .as_ref()
            .filter(|d| d.text_tokens.is_some() || d.image_tokens.is_some());
        let (output_text_tokens, output_image_tokens) = match detailed {
            Some(d) => (clamp_tokens(d.text_tokens), clamp_tokens(d.image_tokens)),
            None => match usage.image_output_tokens {
                Some(_) => (0, clamp_tokens(usage.image_output_tokens)),
                None => (0, clamp_tokens(usage.output_tokens)),
            },
        };

        GenerationUsage {
            input_text_tokens,
            input_image_tokens,
            output_text_tokens,
            output_image_tokens,
            total_tokens: 0,
        }
        .with_total(usage.total_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gpt_image_usage_with_details() {
        let usage: OpenAIImageUsage = serde_json::from_value(json!({
            "input_tokens": 50,
            "output_tokens": 1056,
            "total_tokens": 1106,
            "input_tokens_details": {"text_tokens": 40, "image_tokens": 10}
        }))
        .unwrap();
        let normalized = GenerationUsage::from(&usage);
        assert_eq!(normalized.input_text_tokens, 40);
        assert_eq!(normalized.input_image_tokens, 10);
        assert_eq!(normalized.output_image_tokens, 1056);
        assert_eq!(normalized.total_tokens, 1106);
    }

    #[test]
    fn test_flat_image_output_tokens() {
        let usage: OpenAIImageUsage = serde_json::from_value(json!({
            "input_tokens": 8100,
            "image_output_tokens": 2000
        }))
        .unwrap();
        let normalized = GenerationUsage::from(&usage);
        assert_eq!(normalized.input_text_tokens, 8100);
        assert_eq!(normalized.output_image_tokens, 2000);
        assert_eq!(normalized.total_tokens, 10100);
    }

    #[test]
    fn test_output_details_split_text_and_image() {
        let usage: OpenAIImageUsage = serde_json::from_value(json!({
            "input_tokens": -7,
            "output_tokens": 1100,
            "output_tokens_details": {"text_tokens": 44, "image_tokens": 1056}
        }))
        .unwrap();
        let normalized = GenerationUsage::from(&usage);
        assert_eq!(normalized.input_text_tokens, 0);
        assert_eq!(normalized.output_text_tokens, 44);
        assert_eq!(normalized.output_image_tokens, 1056);
    }
}
