use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SiteConfig;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Portfolio site generator")]
pub struct CliArgs {
    /// Site config file (default: ./folio.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the output directory
    #[arg(long, global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Project data location, tried in the order given (file or http(s) URL)
    #[arg(long = "data", global = true, value_name = "PATH|URL")]
    pub data: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Regenerate every page from the project data (default)
    Build,

    /// Add a project to the data file
    Add {
        title: String,
        #[arg(default_value = "A new project")]
        description: String,
        /// Comma-separated technologies
        technologies: Option<String>,
        /// Comma-separated features
        features: Option<String>,
    },

    /// Remove a project by id (slug)
    Remove { id: String },

    /// Print the projects matching a category and/or query
    Search {
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show or change the stored theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Serve the output directory with a preview API
    Serve {
        #[arg(long)]
        port: Option<u16>,
        /// Rebuild when the data file or templates change
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeAction {
    Show,
    Light,
    Dark,
    Toggle,
    /// Forget the stored choice and use the configured default
    Reset,
}

impl CliArgs {
    /// Apply flag overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut SiteConfig) {
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }
        if !self.data.is_empty() {
            config.data_candidates = self.data.clone();
        }
    }
}

/// Split a comma-separated argument, dropping empty entries.
pub fn split_list(arg: Option<&str>) -> Vec<String> {
    arg.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
