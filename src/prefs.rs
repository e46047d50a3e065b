use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PrefsError;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme \"{}\"", other)),
        }
    }
}

/// Local key-value preference store. Values are JSON, mirroring the
/// browser helper that `JSON.stringify`s into `localStorage`.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), PrefsError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;
}

/// JSON object on disk. An unreadable or corrupt file reads as empty.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl FilePreferenceStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable preferences {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        FilePreferenceStore { path, values }
    }

    fn flush(&self) -> Result<(), PrefsError> {
        let body = serde_json::to_string_pretty(&self.values)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PrefsError::Write {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }
        fs::write(&self.path, body).map_err(|e| PrefsError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Reads the stored theme once at startup and writes it on every change.
pub struct ThemeToggle<S: PreferenceStore> {
    store: S,
    current: Theme,
    fallback: Theme,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    /// Stored preference wins; `fallback` stands in for the system setting.
    pub fn new(store: S, fallback: Theme) -> Self {
        let current = store
            .get(THEME_KEY)
            .and_then(|v| v.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(fallback);
        ThemeToggle {
            store,
            current,
            fallback,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Whether a preference has been stored explicitly.
    pub fn is_stored(&self) -> bool {
        self.store.get(THEME_KEY).is_some()
    }

    pub fn set(&mut self, theme: Theme) -> Result<Theme, PrefsError> {
        self.store.set(THEME_KEY, serde_json::to_value(theme)?)?;
        self.current = theme;
        log::info!("Switched to {} mode", theme);
        Ok(theme)
    }

    pub fn toggle(&mut self) -> Result<Theme, PrefsError> {
        self.set(self.current.toggled())
    }

    /// Forget the stored choice and follow the fallback again.
    pub fn clear(&mut self) -> Result<Theme, PrefsError> {
        self.store.remove(THEME_KEY)?;
        self.current = self.fallback;
        log::info!("Cleared stored theme; using {} mode", self.current);
        Ok(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct MemoryPreferenceStore {
        values: BTreeMap<String, Value>,
    }

    impl PreferenceStore for MemoryPreferenceStore {
        fn get(&self, key: &str) -> Option<Value> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: Value) -> Result<(), PrefsError> {
            self.values.insert(key.to_string(), value);
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
            self.values.remove(key);
            Ok(())
        }
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut toggle = ThemeToggle::new(MemoryPreferenceStore::default(), Theme::Light);
        assert!(!toggle.is_stored());
        assert_eq!(toggle.toggle().unwrap(), Theme::Dark);
        assert_eq!(toggle.toggle().unwrap(), Theme::Light);
        assert!(toggle.is_stored());
        assert_eq!(toggle.store.get(THEME_KEY), Some(Value::String("light".into())));
    }

    #[test]
    fn clear_returns_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let mut toggle = ThemeToggle::new(FilePreferenceStore::open(&path), Theme::Dark);
        toggle.set(Theme::Light).unwrap();
        assert_eq!(toggle.clear().unwrap(), Theme::Dark);
        assert!(!toggle.is_stored());

        let reopened = ThemeToggle::new(FilePreferenceStore::open(&path), Theme::Dark);
        assert!(!reopened.is_stored());
        assert_eq!(reopened.current(), Theme::Dark);
    }

    #[test]
    fn stored_theme_beats_fallback() {
        let mut store = MemoryPreferenceStore::default();
        store.set(THEME_KEY, Value::String("dark".into())).unwrap();
        let toggle = ThemeToggle::new(store, Theme::Light);
        assert_eq!(toggle.current(), Theme::Dark);
    }

    #[test]
    fn garbage_value_falls_back() {
        let mut store = MemoryPreferenceStore::default();
        store.set(THEME_KEY, Value::String("sepia".into())).unwrap();
        let toggle = ThemeToggle::new(store, Theme::Dark);
        assert_eq!(toggle.current(), Theme::Dark);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        {
            let mut toggle = ThemeToggle::new(FilePreferenceStore::open(&path), Theme::Light);
            toggle.set(Theme::Dark).unwrap();
        }
        let toggle = ThemeToggle::new(FilePreferenceStore::open(&path), Theme::Light);
        assert_eq!(toggle.current(), Theme::Dark);
    }

    #[test]
    fn corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();
        let store = FilePreferenceStore::open(&path);
        assert!(store.get(THEME_KEY).is_none());
    }
}
