//! Static per-provider pricing tables.
//!
//! Prices are USD and reflect the vendors' published list prices. Tables are
//! compiled in and never mutated; lookups never fail, they fall back to the
//! provider's default model and the model's default tier.

pub mod gemini;
pub mod openai;

use crate::usage::TokenRates;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTier {
    pub quality: &'static str,
    pub size: &'static str,
    pub per_image: f64,
    /// Output tokens one image of this tier is billed as.
    pub output_tokens: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    /// Matched as a prefix of the requested model name.
    pub model: &'static str,
    pub rates: TokenRates,
    pub default_quality: &'static str,
    pub default_size: &'static str,
    pub image_tiers: &'static [ImageTier],
}

impl ModelPricing {
    /// Tier for `(quality, size)`, degrading to the model defaults one axis at a time.
    pub fn image_tier(&self, quality: &str, size: &str) -> Option<&'static ImageTier> {
        let tiers = self.image_tiers;
        let find = |q: &str, s: &str| {
            tiers
                .iter()
                .find(|t| t.quality.eq_ignore_ascii_case(q) && t.size.eq_ignore_ascii_case(s))
        };
        find(quality, size)
            .or_else(|| find(self.default_quality, size))
            .or_else(|| find(quality, self.default_size))
            .or_else(|| find(self.default_quality, self.default_size))
            .or_else(|| tiers.first())
    }

    pub fn supports_images(&self) -> bool {
        !self.image_tiers.is_empty()
    }
}

/// Longest prefix match; `default` when nothing matches.
pub fn lookup(
    table: &'static [ModelPricing],
    model: &str,
    default: &'static ModelPricing,
) -> &'static ModelPricing {
    let model = model.trim().to_ascii_lowercase();
    let model = model.strip_prefix("models/").unwrap_or(&model);
    table
        .iter()
        .filter(|p| model.starts_with(p.model))
        .max_by_key(|p| p.model.len())
        .unwrap_or(default)
}
