//! Commits rendered trees into host page templates. A template is plain
//! HTML with `{{TOKEN}}` hooks; every occurrence of a token is replaced
//! verbatim and unknown leftovers are stripped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::GenerateError;

pub const HOME_TEMPLATE: &str = include_str!("../templates/home.html");
pub const PROJECT_TEMPLATE: &str = include_str!("../templates/project.html");
pub const STATUS_TEMPLATE: &str = include_str!("../templates/status.html");

/// Hooks the homepage scripts and renderers expect.
pub const HOME_HOOKS: &[&str] = &[
    "HEAD",
    "THEME_SCRIPT",
    "THEME_TOGGLE",
    "CATEGORY_FILTER",
    "SEARCH_INPUT",
    "PROJECTS_GRID",
    "SCRIPTS",
];

pub const PROJECT_HOOKS: &[&str] = &[
    "HEAD",
    "THEME_SCRIPT",
    "THEME_TOGGLE",
    "PROJECT_HEADER",
    "PROJECT_SECTIONS",
    "TOC",
    "NAV_FOOTER",
    "SCRIPTS",
];

pub const STATUS_HOOKS: &[&str] = &["HEAD", "THEME_SCRIPT", "THEME_TOGGLE", "BODY"];

/// Values for the hooks of one page, keyed by token name.
pub type Bindings = BTreeMap<&'static str, String>;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("valid token regex"));
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?projects/([^/]+?)(?:\.html|/)?$").expect("valid slug regex")
});

#[derive(Debug, Clone)]
pub struct PageTemplate {
    source: String,
}

impl PageTemplate {
    pub fn from_source(source: &str) -> Self {
        PageTemplate {
            source: source.to_string(),
        }
    }

    /// Read `name` from `dir` when a template directory is configured and
    /// the file exists, else use the built-in template.
    pub fn load(dir: Option<&Path>, name: &str, builtin: &str) -> Result<Self, GenerateError> {
        if let Some(dir) = dir {
            let path = dir.join(name);
            if path.exists() {
                let source =
                    fs::read_to_string(&path).map_err(|e| GenerateError::io(&path, e))?;
                log::info!("Using template {}", path.display());
                return Ok(PageTemplate { source });
            }
            log::debug!("{} not found, using built-in template", path.display());
        }
        Ok(PageTemplate::from_source(builtin))
    }

    /// Hooks from `required` the template does not contain.
    pub fn missing_hooks<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|hook| !self.source.contains(&format!("{{{{{}}}}}", hook)))
            .copied()
            .collect()
    }

    /// Substitute every binding in one pass over the template source, so
    /// bound values are never rescanned. A missing hook is logged, never
    /// fatal: the page still renders without that part.
    pub fn fill(&self, bindings: &Bindings, required: &[&str]) -> String {
        for hook in self.missing_hooks(required) {
            log::warn!("Template has no {{{{{}}}}} hook; that part is skipped", hook);
        }
        TOKEN_RE
            .replace_all(&self.source, |caps: &Captures| {
                bindings.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}

/// Slug from a detail page path: `/projects/<slug>.html` or
/// `/projects/<slug>/`. Anything else has no slug.
pub fn slug_from_path(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    SLUG_RE
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// Emoji marker for a project title, used by the `{{PROJECT_ICON}}` hook.
pub fn project_icon(title: &str) -> &'static str {
    const ICONS: &[(&str, &str)] = &[
        ("e-commerce", "\u{1F6D2}"),
        ("weather", "\u{1F324}\u{FE0F}"),
        ("task management", "\u{2705}"),
        ("portfolio", "\u{1F4BC}"),
        ("dashboard", "\u{1F4CA}"),
        ("app", "\u{1F4F1}"),
    ];
    let lower = title.to_lowercase();
    ICONS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or("\u{1F680}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_replaces_all_occurrences_and_strips_unknown() {
        let t = PageTemplate::from_source("<h1>{{TITLE}}</h1><title>{{TITLE}}</title>{{UNUSED}}");
        let mut b = Bindings::new();
        b.insert("TITLE", "Orbit & Co".to_string());
        assert_eq!(
            t.fill(&b, &[]),
            "<h1>Orbit & Co</h1><title>Orbit & Co</title>"
        );
    }

    #[test]
    fn bound_values_pass_through_verbatim() {
        let t = PageTemplate::from_source("<p>{{DESCRIPTION}}</p><footer>{{YEAR}}</footer>");
        let mut b = Bindings::new();
        b.insert("DESCRIPTION", "Renders {{NAME}} and {{YEAR}} placeholders".to_string());
        b.insert("YEAR", "2024".to_string());
        assert_eq!(
            t.fill(&b, &[]),
            "<p>Renders {{NAME}} and {{YEAR}} placeholders</p><footer>2024</footer>"
        );
    }

    #[test]
    fn reports_missing_hooks() {
        let t = PageTemplate::from_source("{{HEAD}}<main>{{PROJECTS_GRID}}</main>");
        let missing = t.missing_hooks(HOME_HOOKS);
        assert!(missing.contains(&"CATEGORY_FILTER"));
        assert!(!missing.contains(&"HEAD"));
    }

    #[test]
    fn builtin_templates_carry_their_hooks() {
        assert!(PageTemplate::from_source(HOME_TEMPLATE).missing_hooks(HOME_HOOKS).is_empty());
        assert!(PageTemplate::from_source(PROJECT_TEMPLATE)
            .missing_hooks(PROJECT_HOOKS)
            .is_empty());
        assert!(PageTemplate::from_source(STATUS_TEMPLATE)
            .missing_hooks(STATUS_HOOKS)
            .is_empty());
    }

    #[test]
    fn slug_extraction() {
        assert_eq!(slug_from_path("/projects/orbit.html"), Some("orbit".into()));
        assert_eq!(slug_from_path("projects/orbit/"), Some("orbit".into()));
        assert_eq!(slug_from_path("/projects/orbit.html?x=1"), Some("orbit".into()));
        assert_eq!(slug_from_path("/projects/"), None);
        assert_eq!(slug_from_path("/about.html"), None);
    }

    #[test]
    fn icons_by_keyword() {
        assert_eq!(project_icon("Weather App"), "\u{1F324}\u{FE0F}");
        assert_eq!(project_icon("Compiler"), "\u{1F680}");
    }
}
