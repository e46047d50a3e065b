pub mod jsonld;
pub mod meta;
pub mod sitemap;

pub use meta::{HeadTags, SeoWriter};
pub use sitemap::{generate_robots, generate_sitemap};

/// Keeps serialized JSON from closing the surrounding `<script>`.
fn script_safe_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}
