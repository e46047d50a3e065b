use std::path::PathBuf;

use thiserror::Error;

/// Failures of the project data resource.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A single candidate could not be read. Recovered by trying the next one.
    #[error("{candidate} unreachable: {reason}")]
    Unreachable { candidate: String, reason: String },

    /// Every candidate failed and this page context has no embedded list.
    #[error("unable to load projects; tried: {}", .tried.join(", "))]
    Exhausted { tried: Vec<String> },

    /// A candidate answered but its body is not a project document.
    #[error("invalid project data from {candidate}: {reason}")]
    Parse { candidate: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("cannot encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no projects found in {}", .0.display())]
    NoProjects(PathBuf),

    #[error("project with id \"{0}\" not found")]
    ProjectNotFound(String),
}

impl GenerateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("cannot write preferences {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode preference: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Top-level failure of a CLI command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Prefs(#[from] PrefsError),

    #[error("preview server failed: {0}")]
    Serve(String),
}
