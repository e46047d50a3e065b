use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::SiteConfig;
use crate::loader::ProjectSource;
use crate::prefs::{FilePreferenceStore, ThemeToggle};
use crate::render::CardOptions;

/// Everything the components need, built once in `main` and passed down by
/// reference. Relative paths in the config resolve against `root`.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: SiteConfig,
    pub root: PathBuf,
}

impl AppContext {
    pub fn new(config: SiteConfig, root: impl Into<PathBuf>) -> Self {
        AppContext {
            config,
            root: root.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output_dir)
    }

    pub fn projects_file(&self) -> PathBuf {
        self.resolve(&self.config.projects_file)
    }

    pub fn template_dir(&self) -> Option<PathBuf> {
        self.config.template_dir.as_deref().map(|d| self.resolve(d))
    }

    pub fn prefs_file(&self) -> PathBuf {
        self.resolve(&self.config.prefs_file)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.config.fetch_timeout_secs)
    }

    /// Data source over the configured candidates.
    pub fn project_source(&self) -> ProjectSource {
        ProjectSource::from_candidates(
            &self.config.data_candidates,
            &self.root,
            self.fetch_timeout(),
            self.config.tie_break,
        )
    }

    pub fn card_options(&self) -> CardOptions {
        CardOptions::from_config(&self.config)
    }

    pub fn theme_toggle(&self) -> ThemeToggle<FilePreferenceStore> {
        ThemeToggle::new(
            FilePreferenceStore::open(self.prefs_file()),
            self.config.default_theme,
        )
    }
}
