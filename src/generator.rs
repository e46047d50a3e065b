use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use log::{info, warn};

use crate::app::AppContext;
use crate::dom::{html_escape, Element, Node};
use crate::error::{GenerateError, LoadError};
use crate::filter::FilterState;
use crate::loader::{parse_document, Loaded, Origin, PageKind, ProjectSource};
use crate::models::collection::ProjectCollection;
use crate::models::project::{BuildSection, Project, ProjectDocument};
use crate::nav::{build_toc, compute_adjacent, render_nav_footer, render_toc, AdjacencyMode, SpyBand};
use crate::page::{
    project_icon, slug_from_path, Bindings, PageTemplate, HOME_HOOKS, HOME_TEMPLATE,
    PROJECT_HOOKS, PROJECT_TEMPLATE, STATUS_HOOKS, STATUS_TEMPLATE,
};
use crate::prefs::Theme;
use crate::render::detail::render_detail;
use crate::render::home::{render_filters, render_listing, render_load_error, render_theme_button};
use crate::render::{scripts, states};
use crate::seo::{generate_robots, generate_sitemap, HeadTags, SeoWriter};

/// Result of resolving a detail page request.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Found(String),
    NotFound(String),
    Error(String),
}

impl PageOutcome {
    pub fn html(&self) -> &str {
        match self {
            PageOutcome::Found(h) | PageOutcome::NotFound(h) | PageOutcome::Error(h) => h,
        }
    }
}

#[derive(Debug)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    pub project_count: usize,
    pub origin: Origin,
}

/// The three host templates, from `template_dir` when present.
#[derive(Debug, Clone)]
pub struct PageSet {
    pub home: PageTemplate,
    pub project: PageTemplate,
    pub status: PageTemplate,
}

impl PageSet {
    pub fn builtin() -> Self {
        PageSet {
            home: PageTemplate::from_source(HOME_TEMPLATE),
            project: PageTemplate::from_source(PROJECT_TEMPLATE),
            status: PageTemplate::from_source(STATUS_TEMPLATE),
        }
    }

    pub fn load(dir: Option<&Path>) -> Result<Self, GenerateError> {
        Ok(PageSet {
            home: PageTemplate::load(dir, "home.html", HOME_TEMPLATE)?,
            project: PageTemplate::load(dir, "project.html", PROJECT_TEMPLATE)?,
            status: PageTemplate::load(dir, "status.html", STATUS_TEMPLATE)?,
        })
    }
}

pub struct Generator<'a> {
    ctx: &'a AppContext,
    pages: PageSet,
    theme: Theme,
    today: NaiveDate,
}

impl<'a> Generator<'a> {
    pub fn new(ctx: &'a AppContext) -> Result<Self, GenerateError> {
        let pages = PageSet::load(ctx.template_dir().as_deref())?;
        Ok(Generator {
            ctx,
            pages,
            theme: ctx.theme_toggle().current(),
            today: Local::now().date_naive(),
        })
    }

    /// Fixed pages, theme and date; no filesystem access.
    pub fn with_parts(ctx: &'a AppContext, pages: PageSet, theme: Theme, today: NaiveDate) -> Self {
        Generator {
            ctx,
            pages,
            theme,
            today,
        }
    }

    fn common(&self, head: &HeadTags) -> Bindings {
        let cfg = &self.ctx.config;
        let mut b = Bindings::new();
        b.insert("HEAD", head.to_html());
        b.insert("LANG", html_escape(&head.lang));
        b.insert("THEME_SCRIPT", scripts::theme_script(self.theme).to_html());
        b.insert("THEME_TOGGLE", render_theme_button(self.theme).to_html());
        b.insert("SITE_NAME", html_escape(&cfg.site_name));
        b.insert("AUTHOR", html_escape(&cfg.author));
        b.insert("JOB_TITLE", html_escape(&cfg.job_title));
        b.insert("SITE_DESCRIPTION", html_escape(&cfg.site_description));
        b.insert("YEAR", self.today.year().to_string());
        b
    }

    /// Homepage for a loaded collection, or with the load-error panel in
    /// place of the grid.
    pub fn render_home(&self, loaded: Option<&ProjectCollection>) -> String {
        let seo = SeoWriter::new(&self.ctx.config);
        let mut head = HeadTags::new();
        seo.apply_home(&mut head);

        let mut b = self.common(&head);
        match loaded {
            Some(base) => {
                let (category, search) = render_filters(base, &FilterState::default());
                b.insert("CATEGORY_FILTER", category.to_html());
                b.insert("SEARCH_INPUT", search.to_html());
                b.insert(
                    "PROJECTS_GRID",
                    render_listing(base, base, &self.ctx.card_options()).to_html(),
                );
            }
            None => {
                b.insert("PROJECTS_GRID", render_load_error().to_html());
            }
        }
        let page_scripts = Node::Fragment(vec![
            scripts::filter_script(self.ctx.config.debounce_ms),
            scripts::carousel_script(),
            scripts::retry_script(),
        ]);
        b.insert("SCRIPTS", page_scripts.to_html());
        self.pages.home.fill(&b, HOME_HOOKS)
    }

    pub fn render_project(&self, collection: &ProjectCollection, project: &Project) -> String {
        let seo = SeoWriter::new(&self.ctx.config);
        let mut head = HeadTags::new();
        seo.apply(&mut head, project);

        let view = render_detail(project);
        let toc = build_toc(&view.sections);
        let adjacent = compute_adjacent(collection, &project.slug, AdjacencyMode::Clip);

        let mut b = self.common(&head);
        b.insert("PROJECT_HEADER", view.header.to_html());
        b.insert("PROJECT_SECTIONS", view.sections_node().to_html());
        b.insert("TOC", render_toc(&toc, toc.first().map(|e| e.anchor.as_str())).to_html());
        b.insert("NAV_FOOTER", render_nav_footer(&adjacent).to_html());
        b.insert("SCRIPTS", scripts::scroll_spy_script(&SpyBand::default()).to_html());

        // flat tokens for hand-written templates
        let description = seo.project_description(project);
        let text = |s: Option<&str>| html_escape(s.unwrap_or(""));
        b.insert("TITLE", html_escape(&project.title));
        b.insert("DESCRIPTION", html_escape(&description));
        b.insert("PROJECT_TITLE", html_escape(&project.title));
        b.insert("PROJECT_TAGLINE", text(project.tagline.as_deref()));
        b.insert("PROJECT_DESCRIPTION", text(project.overview()));
        b.insert("PROJECT_ICON", project_icon(&project.title).to_string());
        b.insert(
            "PROBLEM_STATEMENT",
            html_escape(&project.problem.as_ref().map(|p| p.to_plain()).unwrap_or_default()),
        );
        b.insert(
            "RESEARCH_APPROACH",
            html_escape(&project.research.as_ref().map(|r| r.to_plain()).unwrap_or_default()),
        );
        b.insert("FIGMA_LINK", html_escape(project.figma_link().unwrap_or("#")));
        b.insert("GITHUB_LINK", html_escape(project.repo_link().unwrap_or("#")));
        b.insert(
            "TECHNOLOGIES",
            Node::Fragment(
                project
                    .stack
                    .iter()
                    .map(|t| Element::new("span").class("tech-tag-large").text(t.as_str()).into())
                    .collect(),
            )
            .to_html(),
        );
        for (title_key, url_key, neighbour) in [
            ("PREV_TITLE", "PREV_URL", adjacent.prev),
            ("NEXT_TITLE", "NEXT_URL", adjacent.next),
        ] {
            if let Some(p) = neighbour {
                b.insert(title_key, html_escape(&p.title));
                b.insert(url_key, format!("{}.html", p.slug));
            }
        }

        self.pages.project.fill(&b, PROJECT_HOOKS)
    }

    pub fn render_not_found(&self) -> String {
        let mut head = HeadTags::new();
        SeoWriter::new(&self.ctx.config).apply_not_found(&mut head);
        let mut b = self.common(&head);
        b.insert("BODY", states::not_found_page().to_html());
        self.pages.status.fill(&b, STATUS_HOOKS)
    }

    pub fn render_error(&self) -> String {
        let mut head = HeadTags::new();
        head.title = format!("Error - {}", self.ctx.config.author);
        head.update_meta("robots", "noindex");
        let mut b = self.common(&head);
        b.insert("BODY", states::error_page().to_html());
        self.pages.status.fill(&b, STATUS_HOOKS)
    }

    /// Detail page for a request path. Data-load failure, an unparseable
    /// path and an unknown slug each get their own page.
    pub fn resolve_detail(&self, loaded: Result<&Loaded, &LoadError>, path: &str) -> PageOutcome {
        let loaded = match loaded {
            Ok(l) => l,
            Err(e) => {
                warn!("Error loading project for {}: {}", path, e);
                return PageOutcome::Error(self.render_error());
            }
        };
        let project = slug_from_path(path)
            .and_then(|slug| loaded.collection.find_by_slug(&slug));
        match project {
            Some(p) => PageOutcome::Found(self.render_project(&loaded.collection, p)),
            None => PageOutcome::NotFound(self.render_not_found()),
        }
    }

    /// Regenerate the whole site into the output directory.
    pub fn build(&self, source: &ProjectSource) -> Result<BuildReport, GenerateError> {
        info!("Starting portfolio generation...");
        let loaded = source.load(PageKind::Home)?;
        if loaded.is_fallback() {
            warn!("No project data could be read; building from the embedded sample projects");
        }
        let collection = &loaded.collection;
        if collection.is_empty() {
            return Err(GenerateError::NoProjects(self.ctx.projects_file()));
        }
        info!("Loaded {} projects", collection.len());

        let out = self.ctx.output_dir();
        let projects_dir = out.join("projects");
        fs::create_dir_all(&projects_dir).map_err(|e| GenerateError::io(&projects_dir, e))?;

        let mut written = Vec::new();
        let mut seen = HashSet::new();
        for project in collection {
            if !seen.insert(project.slug.as_str()) {
                warn!(
                    "Duplicate slug \"{}\" ({}); keeping the first record",
                    project.slug, project.title
                );
                continue;
            }
            let path = projects_dir.join(format!("{}.html", project.slug));
            write_file(&path, &self.render_project(collection, project))?;
            info!("Generated {}.html", project.slug);
            written.push(path);
        }

        let index = out.join("index.html");
        write_file(&index, &self.render_home(Some(collection)))?;
        info!("Updated homepage with project data");
        written.push(index);

        let not_found = out.join("404.html");
        write_file(&not_found, &self.render_not_found())?;
        written.push(not_found);

        if let Some(xml) = generate_sitemap(&self.ctx.config, collection, self.today) {
            let path = out.join("sitemap.xml");
            write_file(&path, &xml)?;
            written.push(path);
        }
        let robots = out.join("robots.txt");
        write_file(&robots, &generate_robots(&self.ctx.config))?;
        written.push(robots);

        info!(
            "Portfolio generation completed: {} project pages in {}",
            seen.len(),
            out.display()
        );
        Ok(BuildReport {
            written,
            project_count: seen.len(),
            origin: loaded.origin.clone(),
        })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    fs::write(path, contents).map_err(|e| GenerateError::io(path, e))
}

/// Read the editable data file. A missing file is an empty document.
pub fn read_document(path: &Path) -> Result<ProjectDocument, GenerateError> {
    if !path.exists() {
        return Ok(ProjectDocument::default());
    }
    let body = fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
    let projects = parse_document(&body, &path.display().to_string())?;
    Ok(ProjectDocument { projects })
}

pub fn write_document(path: &Path, doc: &ProjectDocument) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(doc).map_err(|e| GenerateError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_file(path, &json)
}

/// Slug from a title, made unique against `taken` with a numeric suffix.
pub fn unique_slug(title: &str, taken: &[&str], position: usize) -> String {
    let mut base = slug::slugify(title);
    if base.is_empty() {
        base = format!("project-{}", position);
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate.as_str()) {
        candidate = format!("{}-{}", base, n);
        n += 1;
    }
    candidate
}

/// Append a project to the data file.
pub fn add_project(
    ctx: &AppContext,
    title: &str,
    description: &str,
    technologies: Vec<String>,
    features: Vec<String>,
) -> Result<Project, GenerateError> {
    let path = ctx.projects_file();
    let mut doc = read_document(&path)?;
    let slug = {
        let taken: Vec<&str> = doc.projects.iter().map(|p| p.slug.as_str()).collect();
        unique_slug(title, &taken, doc.projects.len() + 1)
    };
    let project = Project {
        thumbnail: Some(format!("/assets/{}.jpg", slug)),
        slug,
        title: title.trim().to_string(),
        overview: Some(description.trim().to_string()).filter(|d| !d.is_empty()),
        year: Some(Local::now().year()),
        stack: technologies,
        build: (!features.is_empty()).then(|| BuildSection {
            description: None,
            features,
        }),
        ..Default::default()
    };
    doc.projects.push(project.clone());
    write_document(&path, &doc)?;
    info!("Added project: {} ({})", project.title, project.slug);
    Ok(project)
}

/// Remove a project by slug from the data file.
pub fn remove_project(ctx: &AppContext, id: &str) -> Result<Project, GenerateError> {
    let path = ctx.projects_file();
    let mut doc = read_document(&path)?;
    let index = doc
        .projects
        .iter()
        .position(|p| p.slug == id)
        .ok_or_else(|| GenerateError::ProjectNotFound(id.to_string()))?;
    let removed = doc.projects.remove(index);
    write_document(&path, &doc)?;
    info!("Removed project: {}", removed.title);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        assert_eq!(unique_slug("Weather App", &[], 1), "weather-app");
        assert_eq!(unique_slug("Weather App", &["weather-app"], 2), "weather-app-2");
        assert_eq!(
            unique_slug("Weather App", &["weather-app", "weather-app-2"], 3),
            "weather-app-3"
        );
        assert_eq!(unique_slug("!!!", &[], 4), "project-4");
    }

    #[test]
    fn outcome_html_accessor() {
        let o = PageOutcome::NotFound("<p>404</p>".into());
        assert_eq!(o.html(), "<p>404</p>");
    }
}
