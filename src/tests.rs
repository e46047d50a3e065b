#![cfg(test)]

use std::cell::Cell;
use std::fs;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::app::AppContext;
use crate::config::{SiteConfig, TieBreak};
use crate::error::{GenerateError, LoadError};
use crate::filter::{filter, FilterController, FilterState};
use crate::generator::{add_project, read_document, remove_project, Generator, PageOutcome, PageSet};
use crate::loader::{Origin, PageKind, ProjectSource, Resolver};
use crate::models::collection::ProjectCollection;
use crate::models::project::Project;
use crate::nav::{build_toc, compute_adjacent, AdjacencyMode, ScrollSpy, SectionBounds, SpyBand};
use crate::prefs::Theme;
use crate::render::detail::render_detail;
use crate::render::home::render_listing;
use crate::render::CardOptions;
use crate::seo::{HeadTags, SeoWriter};

/// In-memory resolver that counts how often it was asked.
struct StubResolver {
    label: &'static str,
    body: Option<&'static str>,
    calls: Rc<Cell<usize>>,
}

impl StubResolver {
    fn ok(label: &'static str, body: &'static str) -> (Box<dyn Resolver>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let r = StubResolver {
            label,
            body: Some(body),
            calls: calls.clone(),
        };
        (Box::new(r), calls)
    }

    fn failing(label: &'static str) -> (Box<dyn Resolver>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let r = StubResolver {
            label,
            body: None,
            calls: calls.clone(),
        };
        (Box::new(r), calls)
    }
}

impl Resolver for StubResolver {
    fn label(&self) -> String {
        self.label.to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        self.calls.set(self.calls.get() + 1);
        self.body.map(str::to_string).ok_or_else(|| LoadError::Unreachable {
            candidate: self.label.to_string(),
            reason: "404".to_string(),
        })
    }
}

const TWO_PROJECTS: &str = r#"{"projects":[
    {"slug":"a","title":"Alpha","year":2020,"tags":["ui"]},
    {"slug":"b","title":"Beta","year":2022,"tags":["api"]}
]}"#;

fn load(resolvers: Vec<Box<dyn Resolver>>, kind: PageKind) -> Result<crate::loader::Loaded, LoadError> {
    ProjectSource::new(resolvers, TieBreak::Source).load(kind)
}

fn slugs(c: &ProjectCollection) -> Vec<&str> {
    c.slugs()
}

fn test_ctx(dir: &std::path::Path) -> AppContext {
    let cfg = SiteConfig {
        author: "Ada".into(),
        base_url: "https://ada.dev".into(),
        data_candidates: vec!["projects.json".into()],
        projects_file: "projects.json".into(),
        output_dir: "public".into(),
        prefs_file: "prefs.json".into(),
        ..Default::default()
    };
    AppContext::new(cfg, dir)
}

fn generator(ctx: &AppContext) -> Generator<'_> {
    Generator::with_parts(
        ctx,
        PageSet::builtin(),
        Theme::Light,
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    )
}

// End-to-end: load, sort, filter, empty state

#[test]
fn default_order_is_year_descending() {
    let (r, _) = StubResolver::ok("data.json", TWO_PROJECTS);
    let loaded = load(vec![r], PageKind::Home).unwrap();
    assert_eq!(slugs(&loaded.collection), vec!["b", "a"]);
    assert_eq!(loaded.origin, Origin::Resolved("data.json".into()));
}

#[test]
fn category_then_search_narrow_the_grid() {
    let (r, _) = StubResolver::ok("data.json", TWO_PROJECTS);
    let loaded = load(vec![r], PageKind::Home).unwrap();
    let mut controller = FilterController::new(loaded.collection, Duration::from_millis(300));

    controller.on_category_change("api");
    assert_eq!(slugs(controller.visible()), vec!["b"]);

    controller.on_category_change("");
    controller.submit_search("nomatch");
    assert!(controller.is_empty_result());

    let html = render_listing(controller.base(), controller.visible(), &CardOptions::default());
    assert!(html.text_content().contains("No projects found"));
    assert!(html
        .find(&|e| e.get_attr("data-action") == Some("clear-filters"))
        .is_some());

    controller.reset();
    assert_eq!(slugs(controller.visible()), vec!["b", "a"]);
}

#[test]
fn debounced_search_waits_for_quiet() {
    let (r, _) = StubResolver::ok("data.json", TWO_PROJECTS);
    let loaded = load(vec![r], PageKind::Home).unwrap();
    let mut controller = FilterController::new(loaded.collection, Duration::from_millis(300));
    let t0 = Instant::now();

    controller.on_search_input("al", t0);
    controller.on_search_input("alpha", t0 + Duration::from_millis(200));
    assert!(!controller.tick(t0 + Duration::from_millis(400)));
    assert_eq!(controller.visible().len(), 2);
    assert!(controller.tick(t0 + Duration::from_millis(500)));
    assert_eq!(slugs(controller.visible()), vec!["a"]);
}

#[test]
fn filter_is_idempotent_on_loaded_data() {
    let (r, _) = StubResolver::ok("data.json", TWO_PROJECTS);
    let c = load(vec![r], PageKind::Home).unwrap().collection;
    let state = FilterState::new("", "BETA ");
    let once = filter(&c, &state);
    assert_eq!(filter(&once, &state), once);
    assert_eq!(slugs(&once), vec!["b"]);
}

// Data access

#[test]
fn first_success_stops_probing() {
    let (bad, bad_calls) = StubResolver::failing("/data/projects.json");
    let (good, good_calls) = StubResolver::ok("projects.json", TWO_PROJECTS);
    let (later, later_calls) = StubResolver::ok("../projects.json", TWO_PROJECTS);
    let loaded = load(vec![bad, good, later], PageKind::Detail).unwrap();
    assert_eq!(loaded.origin, Origin::Resolved("projects.json".into()));
    assert_eq!(bad_calls.get(), 1);
    assert_eq!(good_calls.get(), 1);
    assert_eq!(later_calls.get(), 0);
}

#[test]
fn exhausted_candidates_use_fallback_where_defined() {
    let (a, _) = StubResolver::failing("a");
    let (b, _) = StubResolver::failing("b");
    let loaded = load(vec![a, b], PageKind::Home).unwrap();
    assert!(loaded.is_fallback());
    assert!(!loaded.collection.is_empty());
    assert_eq!(loaded.collection.get(0).and_then(|p| p.year), Some(2024));
}

#[test]
fn exhausted_candidates_without_fallback_fail() {
    let (a, _) = StubResolver::failing("a");
    match load(vec![a], PageKind::Listing) {
        Err(LoadError::Exhausted { tried }) => assert_eq!(tried, vec!["a".to_string()]),
        other => panic!("expected exhausted, got {:?}", other.map(|l| l.origin)),
    }
}

#[test]
fn unparseable_body_ends_probing() {
    let (broken, _) = StubResolver::ok("broken.json", "{ not json");
    let (good, good_calls) = StubResolver::ok("good.json", TWO_PROJECTS);
    assert!(matches!(
        load(vec![broken, good], PageKind::Listing),
        Err(LoadError::Parse { .. })
    ));
    assert_eq!(good_calls.get(), 0);
}

#[test]
fn legacy_field_names_are_accepted() {
    let (r, _) = StubResolver::ok(
        "legacy.json",
        r#"{"projects":[{"id":"p1","title":"Old","description":"Desc","technologies":["JS"]}]}"#,
    );
    let c = load(vec![r], PageKind::Listing).unwrap().collection;
    let p = c.find_by_slug("p1").unwrap();
    assert_eq!(p.overview(), Some("Desc"));
    assert_eq!(p.stack, vec!["JS"]);
}

// Detail page: sections, TOC, navigation, SEO

#[test]
fn toc_follows_rendered_sections() {
    let p = Project {
        slug: "x".into(),
        title: "X".into(),
        overview: Some("o".into()),
        demo: Some("d".into()),
        ..Default::default()
    };
    let view = render_detail(&p);
    let toc = build_toc(&view.sections);
    let anchors: Vec<&str> = toc.iter().map(|e| e.anchor.as_str()).collect();
    assert_eq!(anchors, vec!["overview", "demo-code"]);
    assert_eq!(toc[1].title, "Demo & Code");
}

#[test]
fn detail_adjacency_is_clipped() {
    let (r, _) = StubResolver::ok("data.json", TWO_PROJECTS);
    let c = load(vec![r], PageKind::Detail).unwrap().collection;
    let first = compute_adjacent(&c, "b", AdjacencyMode::Clip);
    assert!(first.prev.is_none());
    assert_eq!(first.next.map(|p| p.slug.as_str()), Some("a"));
    let last = compute_adjacent(&c, "a", AdjacencyMode::Clip);
    assert_eq!(last.prev.map(|p| p.slug.as_str()), Some("b"));
    assert!(last.next.is_none());
}

#[test]
fn scroll_spy_tracks_one_section() {
    let mut spy = ScrollSpy::new(SpyBand::default());
    let sections = [
        SectionBounds { id: "overview", top: 100.0, bottom: 220.0 },
        SectionBounds { id: "build", top: 230.0, bottom: 800.0 },
    ];
    assert_eq!(spy.observe(&sections, 1000.0), Some("build"));
    assert_eq!(spy.active(), Some("build"));
}

#[test]
fn seo_apply_twice_keeps_one_description() {
    let cfg = SiteConfig::default();
    let writer = SeoWriter::new(&cfg);
    let p = Project {
        slug: "x".into(),
        title: "X".into(),
        overview: Some("Overview text".into()),
        ..Default::default()
    };
    let mut head = HeadTags::new();
    writer.apply(&mut head, &p);
    writer.apply(&mut head, &p);
    assert_eq!(head.count("description"), 1);
    assert_eq!(head.meta("description"), Some("Overview text"));
}

#[test]
fn resolve_detail_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());
    let gen = generator(&ctx);
    let (r, _) = StubResolver::ok("data.json", TWO_PROJECTS);
    let loaded = load(vec![r], PageKind::Detail);

    match gen.resolve_detail(loaded.as_ref(), "/projects/a.html") {
        PageOutcome::Found(html) => {
            assert!(html.contains("<h1 id=\"project-title\">Alpha</h1>"));
            assert!(html.contains("Alpha - Ada"));
            assert!(!html.contains("{{"));
        }
        other => panic!("expected page, got {:?}", other),
    }
    assert!(matches!(
        gen.resolve_detail(loaded.as_ref(), "/projects/missing.html"),
        PageOutcome::NotFound(_)
    ));
    assert!(matches!(
        gen.resolve_detail(loaded.as_ref(), "/about"),
        PageOutcome::NotFound(_)
    ));

    let err = LoadError::Exhausted { tried: vec![] };
    assert!(matches!(gen.resolve_detail(Err(&err), "/projects/a.html"), PageOutcome::Error(_)));
}

// Generator

#[test]
fn add_then_remove_round_trips_the_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let first = add_project(&ctx, "Weather App", "Forecasts", vec!["Rust".into()], vec![]).unwrap();
    let second = add_project(&ctx, "Weather App", "Again", vec![], vec!["Alerts".into()]).unwrap();
    assert_eq!(first.slug, "weather-app");
    assert_eq!(second.slug, "weather-app-2");

    let doc = read_document(&ctx.projects_file()).unwrap();
    assert_eq!(doc.projects.len(), 2);
    assert_eq!(doc.projects[1].build.as_ref().unwrap().features, vec!["Alerts"]);

    remove_project(&ctx, "weather-app").unwrap();
    let doc = read_document(&ctx.projects_file()).unwrap();
    assert_eq!(doc.projects.len(), 1);
    assert!(matches!(
        remove_project(&ctx, "weather-app"),
        Err(GenerateError::ProjectNotFound(_))
    ));
}

#[test]
fn build_writes_every_page() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("projects.json"), TWO_PROJECTS).unwrap();
    let ctx = test_ctx(dir.path());
    let report = generator(&ctx).build(&ctx.project_source()).unwrap();

    assert_eq!(report.project_count, 2);
    let out = ctx.output_dir();
    for file in ["index.html", "404.html", "sitemap.xml", "robots.txt", "projects/a.html", "projects/b.html"] {
        assert!(out.join(file).exists(), "missing {}", file);
    }

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
    assert!(index.contains("Showing 2 of 2 projects"));
    assert!(index.contains("id=\"category-filter\""));
    assert!(index.find("data-project-slug=\"b\"") < index.find("data-project-slug=\"a\""));

    let b = fs::read_to_string(out.join("projects/b.html")).unwrap();
    assert!(b.contains("<a id=\"prev-project\" class=\"project-nav__link\" hidden>"));
    assert!(b.contains("href=\"a.html\""));

    let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
    assert!(robots.ends_with("Sitemap: https://ada.dev/sitemap.xml"));
}

#[test]
fn build_with_empty_data_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("projects.json"), r#"{"projects":[]}"#).unwrap();
    let ctx = test_ctx(dir.path());
    assert!(matches!(
        generator(&ctx).build(&ctx.project_source()),
        Err(GenerateError::NoProjects(_))
    ));
}

#[test]
fn homepage_without_data_shows_error_panel() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());
    let html = generator(&ctx).render_home(None);
    assert!(html.contains("Unable to load projects"));
    assert!(html.contains("data-action=\"retry\""));
    assert!(html.contains("location.reload()"));
    assert!(!html.contains("No projects found"));
}

#[test]
fn project_text_with_braces_is_kept_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("projects.json"),
        r#"{"projects":[{"slug":"tpl","title":"Templating","year":2023,
            "overview":"Renders {{NAME}} and {{YEAR}} placeholders"}]}"#,
    )
    .unwrap();
    let ctx = test_ctx(dir.path());
    generator(&ctx).build(&ctx.project_source()).unwrap();

    let page = fs::read_to_string(ctx.output_dir().join("projects/tpl.html")).unwrap();
    assert!(page.contains("content=\"Renders {{NAME}} and {{YEAR}} placeholders\""));
    assert!(!page.contains("Renders  and 2024"));
}

#[test]
fn duplicate_slug_builds_the_first_record() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("projects.json"),
        r#"{"projects":[
            {"slug":"dup","title":"First","year":2021},
            {"slug":"dup","title":"Second","year":2021}
        ]}"#,
    )
    .unwrap();
    let ctx = test_ctx(dir.path());
    let report = generator(&ctx).build(&ctx.project_source()).unwrap();
    assert_eq!(report.project_count, 1);

    let page = fs::read_to_string(ctx.output_dir().join("projects/dup.html")).unwrap();
    assert!(page.contains("<h1 id=\"project-title\">First</h1>"));
    assert!(!page.contains("<h1 id=\"project-title\">Second</h1>"));

    let sitemap = fs::read_to_string(ctx.output_dir().join("sitemap.xml")).unwrap();
    assert_eq!(sitemap.matches("projects/dup.html").count(), 1);
}

#[test]
fn unsafe_slugs_are_dropped_at_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("projects.json"),
        r#"{"projects":[
            {"slug":"../../escaped","title":"Escaper","year":2022},
            {"slug":"safe_one-2","title":"Safe","year":2021},
            {"slug":"","title":"Blank","year":2020}
        ]}"#,
    )
    .unwrap();
    let ctx = test_ctx(dir.path());

    let loaded = ctx.project_source().load(PageKind::Listing).unwrap();
    assert_eq!(slugs(&loaded.collection), vec!["safe_one-2"]);

    let report = generator(&ctx).build(&ctx.project_source()).unwrap();
    assert_eq!(report.project_count, 1);
    assert!(!dir.path().join("escaped.html").exists());
    assert!(!ctx.output_dir().join("escaped.html").exists());
    assert!(ctx.output_dir().join("projects/safe_one-2.html").exists());
}

// Ordering

fn dated(slug: &str, title: &str, year: Option<i32>) -> Project {
    Project {
        slug: slug.into(),
        title: title.into(),
        year,
        ..Default::default()
    }
}

#[test]
fn equal_years_keep_input_order() {
    let projects = vec![
        dated("z", "Zeta", Some(2021)),
        dated("m", "Mu", Some(2023)),
        dated("a", "Alpha", Some(2021)),
        dated("k", "Kappa", Some(2021)),
    ];
    let c = ProjectCollection::sorted(projects, TieBreak::Source);
    assert_eq!(slugs(&c), vec!["m", "z", "a", "k"]);
}

#[test]
fn title_tie_break_orders_equal_years() {
    let projects = vec![
        dated("z", "Zeta", Some(2021)),
        dated("m", "Mu", Some(2023)),
        dated("a", "alpha", Some(2021)),
        dated("k", "Kappa", Some(2021)),
    ];
    let c = ProjectCollection::sorted(projects, TieBreak::Title);
    assert_eq!(slugs(&c), vec!["m", "a", "k", "z"]);
}

#[test]
fn undated_projects_sort_last() {
    let projects = vec![
        dated("u1", "Undated", None),
        dated("old", "Old", Some(2019)),
        dated("u2", "Also undated", None),
        dated("new", "New", Some(2024)),
    ];
    let c = ProjectCollection::sorted(projects, TieBreak::Source);
    assert_eq!(slugs(&c), vec!["new", "old", "u1", "u2"]);
}
