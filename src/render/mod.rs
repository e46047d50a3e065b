pub mod card;
pub mod detail;
pub mod home;
pub mod scripts;
pub mod states;

use crate::config::SiteConfig;

/// Display knobs shared by the card renderers.
#[derive(Debug, Clone)]
pub struct CardOptions {
    pub subtitle_len: usize,
    pub overview_len: usize,
    pub tag_limit: usize,
    pub placeholder_image: String,
    /// Prefix for detail links, e.g. "" on the homepage or "/" from the
    /// preview server.
    pub link_prefix: String,
}

impl Default for CardOptions {
    fn default() -> Self {
        CardOptions {
            subtitle_len: 80,
            overview_len: 120,
            tag_limit: 4,
            placeholder_image: "/assets/placeholder-project.jpg".to_string(),
            link_prefix: String::new(),
        }
    }
}

impl CardOptions {
    pub fn from_config(cfg: &SiteConfig) -> Self {
        CardOptions {
            subtitle_len: cfg.subtitle_truncate,
            overview_len: cfg.overview_truncate,
            tag_limit: cfg.card_tag_limit,
            placeholder_image: cfg.placeholder_image.clone(),
            link_prefix: String::new(),
        }
    }
}

/// Text of at most `max` characters, else exactly `max` characters
/// followed by "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}
