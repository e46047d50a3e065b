use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use crate::config::TieBreak;
use crate::error::LoadError;
use crate::fallback::fallback_projects;
use crate::models::collection::ProjectCollection;
use crate::models::project::{Project, ProjectDocument};

/// One candidate location for the project data resource.
pub trait Resolver {
    /// Human-readable location, used in logs and error reports.
    fn label(&self) -> String;
    fn fetch(&self) -> Result<String, LoadError>;
}

pub struct FileResolver {
    path: PathBuf,
}

impl FileResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileResolver { path: path.into() }
    }
}

impl Resolver for FileResolver {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        fs::read_to_string(&self.path).map_err(|e| LoadError::Unreachable {
            candidate: self.label(),
            reason: e.to_string(),
        })
    }
}

pub struct HttpResolver {
    url: url::Url,
    timeout: Duration,
}

impl HttpResolver {
    pub fn new(url: url::Url, timeout: Duration) -> Self {
        HttpResolver { url, timeout }
    }
}

impl Resolver for HttpResolver {
    fn label(&self) -> String {
        self.url.to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        let unreachable = |reason: String| LoadError::Unreachable {
            candidate: self.label(),
            reason,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| unreachable(format!("HTTP client error: {}", e)))?;
        let resp = client
            .get(self.url.clone())
            .send()
            .map_err(|e| unreachable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(unreachable(format!("HTTP status {}", status)));
        }
        resp.text().map_err(|e| unreachable(e.to_string()))
    }
}

/// Build a resolver from a config entry: absolute http(s) URLs are fetched,
/// anything else is a file relative to `base_dir`.
pub fn resolver_for(candidate: &str, base_dir: &Path, timeout: Duration) -> Box<dyn Resolver> {
    if let Ok(url) = url::Url::parse(candidate) {
        if url.scheme() == "http" || url.scheme() == "https" {
            return Box::new(HttpResolver::new(url, timeout));
        }
    }
    let relative = candidate.trim_start_matches("./");
    let path = Path::new(relative);
    if path.is_absolute() {
        Box::new(FileResolver::new(path))
    } else {
        Box::new(FileResolver::new(base_dir.join(path)))
    }
}

/// The page context a load happens for; decides whether the embedded
/// sample list may stand in for real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Detail,
    /// Listings served on demand (preview API, CLI search). No fallback.
    Listing,
}

impl PageKind {
    pub fn has_fallback(self) -> bool {
        matches!(self, PageKind::Home | PageKind::Detail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Resolved(String),
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub collection: ProjectCollection,
    pub origin: Origin,
}

impl Loaded {
    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }
}

pub fn parse_document(body: &str, candidate: &str) -> Result<Vec<Project>, LoadError> {
    serde_json::from_str::<ProjectDocument>(body)
        .map(|doc| doc.projects)
        .map_err(|e| LoadError::Parse {
            candidate: candidate.to_string(),
            reason: e.to_string(),
        })
}

/// Drop records whose slug cannot address a page.
fn retain_addressable(projects: Vec<Project>, candidate: &str) -> Vec<Project> {
    projects
        .into_iter()
        .filter(|p| {
            let ok = p.has_url_safe_slug();
            if !ok {
                warn!(
                    "Skipping project \"{}\" from {}: slug {:?} is not URL-safe",
                    p.title, candidate, p.slug
                );
            }
            ok
        })
        .collect()
}

/// Ordered resolvers tried one at a time; the first success wins.
pub struct ProjectSource {
    resolvers: Vec<Box<dyn Resolver>>,
    tie_break: TieBreak,
}

impl ProjectSource {
    pub fn new(resolvers: Vec<Box<dyn Resolver>>, tie_break: TieBreak) -> Self {
        ProjectSource {
            resolvers,
            tie_break,
        }
    }

    pub fn from_candidates(
        candidates: &[String],
        base_dir: &Path,
        timeout: Duration,
        tie_break: TieBreak,
    ) -> Self {
        let resolvers = candidates
            .iter()
            .map(|c| resolver_for(c, base_dir, timeout))
            .collect();
        Self::new(resolvers, tie_break)
    }

    pub fn labels(&self) -> Vec<String> {
        self.resolvers.iter().map(|r| r.label()).collect()
    }

    /// Single sequential pass over the candidates. A failed candidate is
    /// logged and skipped; nothing is retried.
    fn probe(&self) -> Result<(String, Vec<Project>), LoadError> {
        for resolver in &self.resolvers {
            let label = resolver.label();
            info!("Trying to load projects from: {}", label);
            match resolver.fetch() {
                Ok(body) => {
                    info!("Successfully loaded projects from: {}", label);
                    let projects = retain_addressable(parse_document(&body, &label)?, &label);
                    return Ok((label, projects));
                }
                Err(e) => warn!("Failed to load from {}: {}", label, e),
            }
        }
        Err(LoadError::Exhausted {
            tried: self.labels(),
        })
    }

    pub fn load(&self, kind: PageKind) -> Result<Loaded, LoadError> {
        match self.probe() {
            Ok((label, projects)) => Ok(Loaded {
                collection: ProjectCollection::sorted(projects, self.tie_break),
                origin: Origin::Resolved(label),
            }),
            Err(e) if kind.has_fallback() => {
                warn!("Error loading projects: {}. Using embedded fallback list", e);
                Ok(Loaded {
                    collection: ProjectCollection::sorted(fallback_projects(), self.tie_break),
                    origin: Origin::Fallback,
                })
            }
            Err(e) => Err(e),
        }
    }
}
