//! Provider-agnostic usage and cost records.
//!
//! Adapters fill a [`GenerationUsage`] from whatever the vendor reported and
//! hand it, together with the model's [`TokenRates`], to [`text_cost`] or
//! [`image_cost`].

use serde::{Deserialize, Serialize};

pub const CURRENCY: &str = "USD";

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Rough prompt-length heuristic used when a vendor omits usage metadata.
const CHARS_PER_TOKEN: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationUsage {
    pub input_text_tokens: u64,
    pub input_image_tokens: u64,
    pub output_text_tokens: u64,
    pub output_image_tokens: u64,
    pub total_tokens: u64,
}

impl GenerationUsage {
    /// Fill `total_tokens` from the vendor total, or the component sum when
    /// the vendor did not report a positive total.
    pub fn with_total(mut self, reported_total: Option<i64>) -> Self {
        let reported = clamp_tokens(reported_total);
        self.total_tokens = if reported > 0 { reported } else { self.component_sum() };
        self
    }

    pub fn component_sum(&self) -> u64 {
        self.input_text_tokens
            .saturating_add(self.input_image_tokens)
            .saturating_add(self.output_text_tokens)
            .saturating_add(self.output_image_tokens)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationCost {
    pub input_text_cost: f64,
    pub input_image_cost: f64,
    pub output_text_cost: f64,
    pub output_image_cost: f64,
    pub per_image_cost: f64,
    pub total_image_cost: f64,
    pub total_cost: f64,
    pub currency: String,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub token_based_cost: f64,
    /// Absent for text-only responses.
    pub quality_based_cost: Option<f64>,
}

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenRates {
    pub input_text: f64,
    pub input_image: f64,
    pub output_text: f64,
    pub output_image: f64,
}

/// Vendors occasionally send `null` or negative counts; both mean zero.
pub fn clamp_tokens(value: Option<i64>) -> u64 {
    value.map(|v| v.max(0) as u64).unwrap_or(0)
}

pub fn estimate_prompt_tokens(prompt: &str) -> u64 {
    prompt.chars().count().div_ceil(CHARS_PER_TOKEN) as u64
}

fn per_million(tokens: u64, rate: f64) -> f64 {
    tokens as f64 * rate / TOKENS_PER_MILLION
}

struct TokenCosts {
    input_text: f64,
    input_image: f64,
    output_text: f64,
    output_image: f64,
}

impl TokenCosts {
    fn new(usage: &GenerationUsage, rates: &TokenRates) -> Self {
        Self {
            input_text: per_million(usage.input_text_tokens, rates.input_text),
            input_image: per_million(usage.input_image_tokens, rates.input_image),
            output_text: per_million(usage.output_text_tokens, rates.output_text),
            output_image: per_million(usage.output_image_tokens, rates.output_image),
        }
    }

    fn total(&self) -> f64 {
        self.input_text + self.input_image + self.output_text + self.output_image
    }
}

/// Cost of a text completion: metered by token only.
pub fn text_cost(usage: &GenerationUsage, rates: &TokenRates) -> GenerationCost {
    let costs = TokenCosts::new(usage, rates);
    let token_based = costs.total();
    GenerationCost {
        input_text_cost: costs.input_text,
        input_image_cost: costs.input_image,
        output_text_cost: costs.output_text,
        output_image_cost: costs.output_image,
        per_image_cost: 0.0,
        total_image_cost: 0.0,
        total_cost: token_based,
        currency: CURRENCY.to_string(),
        breakdown: CostBreakdown {
            token_based_cost: token_based,
            quality_based_cost: None,
        },
    }
}

/// Cost of an image generation call.
///
/// Vendors bill image output either per token or as a flat per-image price.
/// Both are computed and the higher one is reported as `total_cost`; the
/// breakdown keeps both so callers can see which model applied.
pub fn image_cost(
    usage: &GenerationUsage,
    rates: &TokenRates,
    per_image_cost: f64,
    image_count: u32,
) -> GenerationCost {
    let costs = TokenCosts::new(usage, rates);
    let token_based = costs.total();
    let quality_based = per_image_cost.max(0.0) * f64::from(image_count);
    GenerationCost {
        input_text_cost: costs.input_text,
        input_image_cost: costs.input_image,
        output_text_cost: costs.output_text,
        output_image_cost: costs.output_image,
        per_image_cost: per_image_cost.max(0.0),
        total_image_cost: quality_based,
        total_cost: token_based.max(quality_based),
        currency: CURRENCY.to_string(),
        breakdown: CostBreakdown {
            token_based_cost: token_based,
            quality_based_cost: Some(quality_based),
        },
    }
}

#[cfg(test)]
pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATES: TokenRates = TokenRates {
        input_text: 5.0,
        input_image: 10.0,
        output_text: 0.0,
        output_image: 40.0,
    };

    #[test]
    fn test_clamp_tokens() {
        assert_eq!(clamp_tokens(None), 0);
        assert_eq!(clamp_tokens(Some(-12)), 0);
        assert_eq!(clamp_tokens(Some(0)), 0);
        assert_eq!(clamp_tokens(Some(1290)), 1290);
    }

    #[test]
    fn test_estimate_prompt_tokens() {
        assert_eq!(estimate_prompt_tokens(""), 0);
        assert_eq!(estimate_prompt_tokens("abcd"), 1);
        assert_eq!(estimate_prompt_tokens("abcde"), 2);
        assert_eq!(estimate_prompt_tokens("a pixel-art knight"), 5);
    }

    #[test]
    fn test_total_prefers_positive_vendor_total() {
        let usage = GenerationUsage {
            input_text_tokens: 10,
            output_image_tokens: 1290,
            ..Default::default()
        };
        assert_eq!(usage.with_total(Some(1400)).total_tokens, 1400);
        assert_eq!(usage.with_total(Some(-1)).total_tokens, 1300);
        assert_eq!(usage.with_total(None).total_tokens, 1300);
    }

    #[test]
    fn test_component_sum_saturates() {
        let huge = clamp_tokens(Some(i64::MAX));
        let usage = GenerationUsage {
            input_text_tokens: huge,
            input_image_tokens: huge,
            output_text_tokens: huge,
            output_image_tokens: huge,
            total_tokens: 0,
        };
        assert_eq!(usage.component_sum(), u64::MAX);
        assert_eq!(usage.with_total(None).total_tokens, u64::MAX);
    }

    #[test]
    fn test_token_costs_scale_linearly() {
        for tokens in [0u64, 1, 1000, 2000, 1_000_000] {
            let usage = GenerationUsage {
                input_text_tokens: tokens,
                output_image_tokens: tokens,
                ..Default::default()
            };
            let cost = image_cost(&usage, &RATES, 0.0, 0);
            assert_close(cost.input_text_cost, tokens as f64 * 5.0 / 1_000_000.0);
            assert_close(cost.output_image_cost, tokens as f64 * 40.0 / 1_000_000.0);
        }
    }

    #[test]
    fn test_image_cost_takes_the_higher_model() {
        let usage = GenerationUsage {
            input_text_tokens: 8100,
            output_image_tokens: 2000,
            ..Default::default()
        };
        let cost = image_cost(&usage, &RATES, 0.04, 1);
        assert_close(cost.output_image_cost, 0.08);
        assert_close(cost.breakdown.token_based_cost, 0.1205);
        assert_eq!(cost.breakdown.quality_based_cost, Some(0.04));
        assert_close(cost.total_cost, 0.1205);

        let cost = image_cost(&usage, &RATES, 0.04, 4);
        assert_close(cost.total_image_cost, 0.16);
        assert_close(cost.total_cost, 0.16);
    }

    #[test]
    fn test_text_cost_has_no_quality_component() {
        let usage = GenerationUsage {
            input_text_tokens: 1000,
            output_text_tokens: 500,
            ..Default::default()
        };
        let rates = TokenRates { input_text: 2.5, input_image: 2.5, output_text: 10.0, output_image: 0.0 };
        let cost = text_cost(&usage, &rates);
        assert_close(cost.total_cost, 0.0075);
        assert_eq!(cost.breakdown.quality_based_cost, None);
        assert_eq!(cost.per_image_cost, 0.0);
        assert_eq!(cost.currency, "USD");
    }

    #[test]
    fn test_cost_serializes_camel_case() {
        let cost = text_cost(&GenerationUsage::default(), &RATES);
        let json = serde_json::to_value(&cost).unwrap();
        assert_eq!(json["currency"], "USD");
        assert!(json["breakdown"]["qualityBasedCost"].is_null());
        assert_eq!(json["totalImageCost"], 0.0);
    }
}
