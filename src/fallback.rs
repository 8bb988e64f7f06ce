use once_cell::sync::Lazy;
use regex::Regex;

struct CannedReply {
    pattern: Regex,
    text: &'static str,
}

fn canned(words: &str, text: &'static str) -> CannedReply {
    let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", words)).expect("static fallback pattern");
    CannedReply { pattern, text }
}

// Checked in order; the first match wins.
static CANNED_REPLIES: Lazy<Vec<CannedReply>> = Lazy::new(|| {
    vec![
        canned(
            r"characters?|heroes|hero|npcs?|sprites?|avatars?",
            "For a character asset, start with a strong silhouette that reads at the size it will be shown in game. \
             Settle on a limited palette, decide the camera angle (side, top-down or isometric) up front, \
             and sketch the idle pose before any animation frames.",
        ),
        canned(
            r"backgrounds?|environments?|scenery|landscapes?|scenes?",
            "For a background, plan depth in layers: a low-contrast far layer, a mid layer that sets the mood, \
             and a foreground that frames the play area. Keep the detail behind the player quiet so gameplay stays readable.",
        ),
        canned(
            r"textures?|materials?|tileable|seamless|patterns?",
            "For a texture, work at a power-of-two resolution and check that it tiles by offsetting it half its width and height. \
             Avoid baked-in directional lighting if the engine will light it, and keep value contrast moderate so repetition is less visible.",
        ),
        canned(
            r"ui|hud|menus?|buttons?|icons?|interface",
            "For UI, design at the target resolution first and keep a consistent grid and corner radius. \
             Give every interactive element clear normal, hover and pressed states, and test icons at their smallest size for legibility.",
        ),
    ]
});

const GENERIC_REPLY: &str = "I can help you plan game assets: characters, backgrounds, textures and UI. \
     Describe what you need and the art style you are aiming for. \
     Connect an AI provider in the settings to get generated answers and images.";

/// Deterministic offline reply chosen by keyword.
pub fn canned_reply(prompt: &str) -> &'static str {
    CANNED_REPLIES
        .iter()
        .find(|reply| reply.pattern.is_match(prompt))
        .map(|reply| reply.text)
        .unwrap_or(GENERIC_REPLY)
}
