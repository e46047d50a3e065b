use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static URL_SAFE_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid slug regex"));

/// On-disk shape of the project data resource: `{ "projects": [...] }`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProjectDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A single portfolio project as it appears in `projects.json`.
///
/// Every narrative section is optional. Older records that used `id`,
/// `description` and `technologies` are accepted through aliases.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "id")]
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, alias = "technologies", skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<TextBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<TextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<DesignSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<Outcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<GalleryImage>,

    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A narrative field that is either one paragraph or a bulleted list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TextBlock {
    Text(String),
    List(Vec<String>),
}

impl TextBlock {
    pub fn is_empty(&self) -> bool {
        match self {
            TextBlock::Text(s) => s.trim().is_empty(),
            TextBlock::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    /// Single-line text, list items joined by spaces.
    pub fn to_plain(&self) -> String {
        match self {
            TextBlock::Text(s) => s.trim().to_string(),
            TextBlock::List(items) => items
                .iter()
                .map(|i| i.trim())
                .filter(|i| !i.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DesignSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BuildSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GalleryImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Outcome entries are metric tiles (`{label, value}`); bare strings are
/// tolerated in the data but never rendered as tiles.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Outcome {
    Metric { label: String, value: Value },
    Note(String),
}

impl Outcome {
    /// `(value, label)` when this entry can be shown as a metric tile.
    pub fn metric(&self) -> Option<(String, &str)> {
        match self {
            Outcome::Metric { label, value } => {
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Null | Value::Bool(false) => String::new(),
                    other => other.to_string(),
                };
                if label.trim().is_empty() || value.trim().is_empty() {
                    None
                } else {
                    Some((value, label.as_str()))
                }
            }
            Outcome::Note(_) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figma: Option<String>,
}

impl Links {
    pub fn is_empty(&self) -> bool {
        non_empty(&self.live).is_none()
            && non_empty(&self.repo).is_none()
            && non_empty(&self.figma).is_none()
    }
}

/// Treat `Some("")` and whitespace-only strings the same as `None`.
pub fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Project {
    pub fn subtitle(&self) -> Option<&str> {
        non_empty(&self.subtitle)
    }

    pub fn overview(&self) -> Option<&str> {
        non_empty(&self.overview)
    }

    pub fn live_link(&self) -> Option<&str> {
        non_empty(&self.links.live)
    }

    pub fn repo_link(&self) -> Option<&str> {
        non_empty(&self.links.repo)
    }

    pub fn figma_link(&self) -> Option<&str> {
        non_empty(&self.links.figma)
    }

    /// Slugs name output files and URL segments: ASCII letters, digits,
    /// `-` and `_` only, never a path separator or `..`.
    pub fn has_url_safe_slug(&self) -> bool {
        URL_SAFE_SLUG_RE.is_match(&self.slug)
    }

    /// Relative URL of the detail page.
    pub fn page_path(&self) -> String {
        format!("projects/{}.html", self.slug)
    }

    /// Lowercased haystack used by free-text search: title, subtitle,
    /// overview, stack entries and tags joined by spaces.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            self.title.as_str(),
            self.subtitle.as_deref().unwrap_or(""),
            self.overview.as_deref().unwrap_or(""),
        ];
        parts.extend(self.stack.iter().map(String::as_str));
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let json = r#"{
            "slug": "weather",
            "title": "Weather App",
            "subtitle": "Forecasts",
            "year": 2023,
            "tags": ["ui", "api"],
            "problem": ["slow", "ugly"],
            "research": "Interviews",
            "outcomes": [{"label": "Users", "value": 1200}, "shipped"],
            "links": {"live": "https://example.com"},
            "heroImage": "/img/hero.png"
        }"#;
        let p: Project = serde_json::from_str(json).unwrap();
        assert_eq!(p.slug, "weather");
        assert_eq!(p.year, Some(2023));
        assert_eq!(p.problem, Some(TextBlock::List(vec!["slow".into(), "ugly".into()])));
        assert_eq!(p.research, Some(TextBlock::Text("Interviews".into())));
        assert_eq!(p.hero_image.as_deref(), Some("/img/hero.png"));
        assert_eq!(p.outcomes[0].metric(), Some(("1200".to_string(), "Users")));
        assert_eq!(p.outcomes[1].metric(), None);
        assert_eq!(p.live_link(), Some("https://example.com"));
        assert_eq!(p.repo_link(), None);
    }

    #[test]
    fn accepts_legacy_field_names() {
        let json = r#"{"id": "project-1", "title": "Dash", "description": "Admin", "technologies": ["HTML"]}"#;
        let p: Project = serde_json::from_str(json).unwrap();
        assert_eq!(p.slug, "project-1");
        assert_eq!(p.overview(), Some("Admin"));
        assert_eq!(p.stack, vec!["HTML".to_string()]);
    }

    #[test]
    fn searchable_text_is_lowercase_and_complete() {
        let p = Project {
            slug: "x".into(),
            title: "Rust CLI".into(),
            subtitle: Some("Fast".into()),
            stack: vec!["Tokio".into()],
            tags: vec!["Tools".into()],
            ..Default::default()
        };
        assert_eq!(p.searchable_text(), "rust cli fast  tokio tools");
    }

    #[test]
    fn empty_text_blocks() {
        assert!(TextBlock::Text("  ".into()).is_empty());
        assert!(TextBlock::List(vec![]).is_empty());
        assert!(!TextBlock::List(vec!["a".into()]).is_empty());
    }
}
