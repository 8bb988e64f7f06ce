use super::{ImageTier, ModelPricing};
use crate::usage::TokenRates;

const fn tier(quality: &'static str, size: &'static str, per_image: f64, output_tokens: u64) -> ImageTier {
    ImageTier { quality, size, per_image, output_tokens }
}

const GPT_IMAGE_TIERS: &[ImageTier] = &[
    tier("low", "1024x1024", 0.011, 272),
    tier("low", "1024x1536", 0.016, 408),
    tier("low", "1536x1024", 0.016, 400),
    tier("medium", "1024x1024", 0.04, 1056),
    tier("medium", "1024x1536", 0.063, 1584),
    tier("medium", "1536x1024", 0.063, 1568),
    tier("high", "1024x1024", 0.167, 4160),
    tier("high", "1024x1536", 0.25, 6240),
    tier("high", "1536x1024", 0.25, 6208),
];

// dall-e-3 reports no token usage; output_tokens stays 0 so estimation adds nothing.
const DALLE3_TIERS: &[ImageTier] = &[
    tier("standard", "1024x1024", 0.04, 0),
    tier("standard", "1024x1792", 0.08, 0),
    tier("standard", "1792x1024", 0.08, 0),
    tier("hd", "1024x1024", 0.08, 0),
    tier("hd", "1024x1792", 0.12, 0),
    tier("hd", "1792x1024", 0.12, 0),
];

// dall-e-2 takes no quality parameter; its single tier name is internal.
const DALLE2_TIERS: &[ImageTier] = &[
    tier("standard", "256x256", 0.016, 0),
    tier("standard", "512x512", 0.018, 0),
    tier("standard", "1024x1024", 0.02, 0),
];

pub const MODELS: &[ModelPricing] = &[
    ModelPricing {
        model: "gpt-image-1",
        rates: TokenRates { input_text: 5.0, input_image: 10.0, output_text: 0.0, output_image: 40.0 },
        default_quality: "medium",
        default_size: "1024x1024",
        image_tiers: GPT_IMAGE_TIERS,
    },
    ModelPricing {
        model: "dall-e-3",
        rates: TokenRates { input_text: 0.0, input_image: 0.0, output_text: 0.0, output_image: 0.0 },
        default_quality: "standard",
        default_size: "1024x1024",
        image_tiers: DALLE3_TIERS,
    },
    ModelPricing {
        model: "dall-e-2",
        rates: TokenRates { input_text: 0.0, input_image: 0.0, output_text: 0.0, output_image: 0.0 },
        default_quality: "standard",
        default_size: "1024x1024",
        image_tiers: DALLE2_TIERS,
    },
    ModelPricing {
        model: "gpt-4o",
        rates: TokenRates { input_text: 2.50, input_image: 2.50, output_text: 10.0, output_image: 0.0 },
        default_quality: "standard",
        default_size: "1024x1024",
        image_tiers: &[],
    },
    ModelPricing {
        model: "gpt-4o-mini",
        rates: TokenRates { input_text: 0.15, input_image: 0.15, output_text: 0.60, output_image: 0.0 },
        default_quality: "standard",
        default_size: "1024x1024",
        image_tiers: &[],
    },
    ModelPricing {
        model: "gpt-4.1",
        rates: TokenRates { input_text: 2.0, input_image: 2.0, output_text: 8.0, output_image: 0.0 },
        default_quality: "standard",
        default_size: "1024x1024",
        image_tiers: &[],
    },
];

pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o";

pub fn image_pricing(model: &str) -> &'static ModelPricing {
    let found = super::lookup(MODELS, model, &MODELS[0]);
    if found.supports_images() { found } else { &MODELS[0] }
}

pub fn text_pricing(model: &str) -> &'static ModelPricing {
    super::lookup(MODELS, model, &MODELS[3])
}

/// Whether images/generations accepts a `quality` field for `model`.
pub fn accepts_quality(model: &str) -> bool {
    !model.trim().to_ascii_lowercase().starts_with("dall-e-2")
}

/// Quality actually sent upstream: the requested one when the model knows
/// it, otherwise the model's default (`auto` included).
pub fn effective_quality(pricing: &ModelPricing, requested: Option<&str>) -> &'static str {
    requested
        .map(str::trim)
        .and_then(|q| {
            pricing
                .image_tiers
                .iter()
                .find(|t| t.quality.eq_ignore_ascii_case(q))
                .map(|t| t.quality)
        })
        .unwrap_or(pricing.default_quality)
}

pub fn effective_size(pricing: &ModelPricing, requested: Option<&str>) -> &'static str {
    requested
        .map(str::trim)
        .and_then(|s| {
            pricing
                .image_tiers
                .iter()
                .find(|t| t.size.eq_ignore_ascii_case(s))
                .map(|t| t.size)
        })
        .unwrap_or(pricing.default_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prefers_longest_prefix() {
        assert_eq!(text_pricing("gpt-4o-mini-2024-07-18").model, "gpt-4o-mini");
        assert_eq!(text_pricing("gpt-4o-2024-08-06").model, "gpt-4o");
        assert_eq!(text_pricing("gpt-4.1-nano").model, "gpt-4.1");
        assert_eq!(text_pricing("o9-unknown").model, "gpt-4o");
        assert_eq!(image_pricing("dall-e-3").model, "dall-e-3");
        assert_eq!(image_pricing("gpt-4o").model, "gpt-image-1");
    }

    #[test]
    fn test_medium_square_is_four_cents() {
        let pricing = image_pricing("gpt-image-1");
        let tier = pricing.image_tier("medium", "1024x1024").unwrap();
        assert_eq!(tier.per_image, 0.04);
        assert_eq!(tier.output_tokens, 1056);
    }

    #[test]
    fn test_unknown_quality_and_size_fall_back_to_medium_square() {
        let pricing = image_pricing("gpt-image-1");
        assert_eq!(effective_quality(pricing, Some("auto")), "medium");
        assert_eq!(effective_quality(pricing, Some("ultra")), "medium");
        assert_eq!(effective_quality(pricing, None), "medium");
        assert_eq!(effective_quality(pricing, Some("HIGH")), "high");
        assert_eq!(effective_size(pricing, Some("640x480")), "1024x1024");
        assert_eq!(effective_size(pricing, Some("1536x1024")), "1536x1024");

        let tier = pricing.image_tier("ultra", "640x480").unwrap();
        assert_eq!((tier.quality, tier.size), ("medium", "1024x1024"));
        let tier = pricing.image_tier("high", "640x480").unwrap();
        assert_eq!(tier.per_image, 0.167);
    }

    #[test]
    fn test_dalle_quality_mapping() {
        let pricing = image_pricing("dall-e-3");
        assert_eq!(effective_quality(pricing, Some("medium")), "standard");
        assert_eq!(effective_quality(pricing, Some("hd")), "hd");
        assert_eq!(pricing.image_tier("hd", "1792x1024").unwrap().per_image, 0.12);
    }

    #[test]
    fn test_dalle2_has_its_own_prices_and_no_quality() {
        let pricing = image_pricing("dall-e-2");
        assert_eq!(pricing.model, "dall-e-2");
        assert_eq!(effective_size(pricing, Some("512x512")), "512x512");
        assert_eq!(effective_quality(pricing, Some("high")), "standard");
        assert_eq!(pricing.image_tier("standard", "512x512").unwrap().per_image, 0.018);
        assert!(!accepts_quality("dall-e-2"));
        assert!(accepts_quality("dall-e-3"));
        assert!(accepts_quality("gpt-image-1"));
    }
}
