use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::prefs::Theme;

pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// How projects that share a `year` are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Keep the order of the data file.
    #[default]
    Source,
    /// Alphabetical by title.
    Title,
}

/// Site configuration read from `folio.toml`. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_name: String,
    pub author: String,
    pub job_title: String,
    pub site_description: String,
    pub base_url: String,
    pub same_as: Vec<String>,
    pub knows_about: Vec<String>,

    /// Ordered candidate locations for the project data resource.
    /// `http://` and `https://` entries are fetched, everything else is a
    /// path relative to the config file.
    pub data_candidates: Vec<String>,
    /// File edited by `add` / `remove`.
    pub projects_file: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub fetch_timeout_secs: u64,

    pub debounce_ms: u64,
    pub subtitle_truncate: usize,
    pub overview_truncate: usize,
    pub card_tag_limit: usize,
    pub tie_break: TieBreak,

    pub social_image: String,
    pub placeholder_image: String,
    pub default_theme: Theme,
    pub prefs_file: PathBuf,
    pub sitemap: bool,
    pub robots_txt: String,
    pub serve_port: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site_name: "Portfolio".to_string(),
            author: "Portfolio Author".to_string(),
            job_title: "Frontend/UI Engineer".to_string(),
            site_description: "Portfolio and case studies.".to_string(),
            base_url: "http://localhost:8000".to_string(),
            same_as: Vec::new(),
            knows_about: Vec::new(),
            data_candidates: vec![
                "data/projects.json".to_string(),
                "projects.json".to_string(),
            ],
            projects_file: PathBuf::from("data/projects.json"),
            template_dir: None,
            output_dir: PathBuf::from("public"),
            fetch_timeout_secs: 10,
            debounce_ms: 300,
            subtitle_truncate: 80,
            overview_truncate: 120,
            card_tag_limit: 4,
            tie_break: TieBreak::Source,
            social_image: "/assets/social-preview.jpg".to_string(),
            placeholder_image: "/assets/placeholder-project.jpg".to_string(),
            default_theme: Theme::Light,
            prefs_file: PathBuf::from(".folio-prefs.json"),
            sitemap: true,
            robots_txt: "User-agent: *\nAllow: /".to_string(),
            serve_port: 8000,
        }
    }
}

impl SiteConfig {
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load the config. An explicit path must exist; without one,
    /// `folio.toml` in `root` is used if present, defaults otherwise.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(SiteConfig::default());
                }
                candidate
            }
        };

        let source = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::from_toml(&source, &path)
    }

    /// `base_url` without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute URL for a site-relative path.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base(), path.trim_start_matches('/'))
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let cfg = SiteConfig::from_toml("author = \"Ada\"\ndebounce_ms = 150", Path::new("x")).unwrap();
        assert_eq!(cfg.author, "Ada");
        assert_eq!(cfg.debounce_ms, 150);
        assert_eq!(cfg.overview_truncate, 120);
        assert_eq!(cfg.tie_break, TieBreak::Source);
    }

    #[test]
    fn tie_break_parses() {
        let cfg = SiteConfig::from_toml("tie_break = \"title\"", Path::new("x")).unwrap();
        assert_eq!(cfg.tie_break, TieBreak::Title);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = SiteConfig::from_toml("debounce_ms = \"soon\"", Path::new("folio.toml"));
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn absolute_urls() {
        let cfg = SiteConfig {
            base_url: "https://nora.dev/".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(cfg.absolute_url("/projects/a.html"), "https://nora.dev/projects/a.html");
        assert_eq!(cfg.absolute_url("https://cdn.x/y.png"), "https://cdn.x/y.png");

        let nested = SiteConfig {
            base_url: "https://user.github.io/folio".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(nested.absolute_url("projects/a.html"), "https://user.github.io/folio/projects/a.html");
    }
}
