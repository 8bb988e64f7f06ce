use super::{ImageTier, ModelPricing};
use crate::usage::TokenRates;

/// Gemini image models have no quality dimension.
pub const STANDARD_QUALITY: &str = "standard";

const FLASH_IMAGE_TIERS: &[ImageTier] = &[ImageTier {
    quality: STANDARD_QUALITY,
    size: "1K",
    per_image: 0.039,
    output_tokens: 1290,
}];

const PRO_IMAGE_TIERS: &[ImageTier] = &[
    ImageTier { quality: STANDARD_QUALITY, size: "1K", per_image: 0.134, output_tokens: 1120 },
    ImageTier { quality: STANDARD_QUALITY, size: "2K", per_image: 0.134, output_tokens: 1120 },
    ImageTier { quality: STANDARD_QUALITY, size: "4K", per_image: 0.24, output_tokens: 2000 },
];

pub const MODELS: &[ModelPricing] = &[
    ModelPricing {
        model: "gemini-2.5-flash-image",
        rates: TokenRates { input_text: 0.30, input_image: 0.30, output_text: 2.50, output_image: 30.0 },
        default_quality: STANDARD_QUALITY,
        default_size: "1K",
        image_tiers: FLASH_IMAGE_TIERS,
    },
    ModelPricing {
        model: "gemini-3-pro-image",
        rates: TokenRates { input_text: 2.0, input_image: 2.0, output_text: 12.0, output_image: 120.0 },
        default_quality: STANDARD_QUALITY,
        default_size: "1K",
        image_tiers: PRO_IMAGE_TIERS,
    },
    ModelPricing {
        model: "gemini-2.5-flash",
        rates: TokenRates { input_text: 0.30, input_image: 0.30, output_text: 2.50, output_image: 0.0 },
        default_quality: STANDARD_QUALITY,
        default_size: "1K",
        image_tiers: &[],
    },
    ModelPricing {
        model: "gemini-2.5-pro",
        rates: TokenRates { input_text: 1.25, input_image: 1.25, output_text: 10.0, output_image: 0.0 },
        default_quality: STANDARD_QUALITY,
        default_size: "1K",
        image_tiers: &[],
    },
    ModelPricing {
        model: "gemini-2.0-flash",
        rates: TokenRates { input_text: 0.10, input_image: 0.10, output_text: 0.40, output_image: 0.0 },
        default_quality: STANDARD_QUALITY,
        default_size: "1K",
        image_tiers: &[],
    },
];

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

pub fn image_pricing(model: &str) -> &'static ModelPricing {
    let found = super::lookup(MODELS, model, &MODELS[0]);
    if found.supports_images() { found } else { &MODELS[0] }
}

pub fn text_pricing(model: &str) -> &'static ModelPricing {
    super::lookup(MODELS, model, &MODELS[2])
}

const ASPECT_RATIOS: &[(&str, u32, u32)] = &[
    ("1:1", 1, 1),
    ("2:3", 2, 3),
    ("3:2", 3, 2),
    ("3:4", 3, 4),
    ("4:3", 4, 3),
    ("4:5", 4, 5),
    ("5:4", 5, 4),
    ("9:16", 9, 16),
    ("16:9", 16, 9),
    ("21:9", 21, 9),
];

fn parse_dimensions(size: &str, separator: char) -> Option<(u32, u32)> {
    let (w, h) = size.trim().split_once(separator)?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// Resolution tier (`1K`, `2K`, `4K`) for a requested size.
///
/// Accepts a tier name directly or `WxH` pixels, tiered by the longest side.
pub fn resolution_tier(size: Option<&str>) -> Option<&'static str> {
    let size = size?.trim();
    for tier in ["1K", "2K", "4K"] {
        if size.eq_ignore_ascii_case(tier) {
            return Some(tier);
        }
    }
    let (w, h) = parse_dimensions(&size.to_ascii_lowercase(), 'x')?;
    Some(match w.max(h) {
        0..=1024 => "1K",
        1025..=2048 => "2K",
        _ => "4K",
    })
}

/// Nearest supported aspect ratio for `W:H` or `WxH` sizes.
pub fn aspect_ratio(size: Option<&str>) -> Option<&'static str> {
    let size = size?.trim().to_ascii_lowercase();
    let (w, h) = parse_dimensions(&size, ':').or_else(|| parse_dimensions(&size, 'x'))?;
    let wanted = f64::from(w) / f64::from(h);
    ASPECT_RATIOS
        .iter()
        .min_by(|a, b| {
            let da = (f64::from(a.1) / f64::from(a.2) - wanted).abs();
            let db = (f64::from(b.1) / f64::from(b.2) - wanted).abs();
            da.total_cmp(&db)
        })
        .map(|(name, _, _)| *name)
}
