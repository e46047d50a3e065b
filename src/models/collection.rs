use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::TieBreak;
use crate::models::project::Project;

/// Ordered, immutable sequence of projects. Filtering produces a new
/// collection and never touches the one it was derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectCollection {
    projects: Vec<Project>,
}

impl ProjectCollection {
    /// Keep the given order as-is.
    pub fn new(projects: Vec<Project>) -> Self {
        ProjectCollection { projects }
    }

    /// Order by `year` descending. Projects without a year sort last.
    /// `Vec::sort_by` is stable, so `TieBreak::Source` keeps input order
    /// for equal years.
    pub fn sorted(mut projects: Vec<Project>, tie_break: TieBreak) -> Self {
        projects.sort_by(|a, b| {
            let by_year = b.year.cmp(&a.year);
            match tie_break {
                TieBreak::Source => by_year,
                TieBreak::Title => by_year.then_with(|| {
                    a.title.to_lowercase().cmp(&b.title.to_lowercase())
                }),
            }
        });
        ProjectCollection { projects }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Project> {
        self.projects.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    /// First project with this slug; duplicates after it are unreachable.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    pub fn position(&self, slug: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.slug == slug)
    }

    #[cfg(test)]
    pub fn slugs(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.slug.as_str()).collect()
    }

    /// Unique tags across the collection, alphabetically sorted.
    pub fn categories(&self) -> Vec<String> {
        self.projects
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<'a> IntoIterator for &'a ProjectCollection {
    type Item = &'a Project;
    type IntoIter = std::slice::Iter<'a, Project>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}

impl FromIterator<Project> for ProjectCollection {
    fn from_iter<I: IntoIterator<Item = Project>>(iter: I) -> Self {
        ProjectCollection::new(iter.into_iter().collect())
    }
}
