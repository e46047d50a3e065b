use serde_json::{json, Map, Value};

use crate::config::SiteConfig;
use crate::models::project::Project;

/// `CreativeWork` for a project page. Optional keys are left out rather
/// than emitted as null.
pub fn project_jsonld(
    cfg: &SiteConfig,
    project: &Project,
    description: &str,
    image: &str,
    url: &str,
) -> Value {
    let mut ld = Map::new();
    ld.insert("@context".into(), json!("https://schema.org"));
    ld.insert("@type".into(), json!("CreativeWork"));
    ld.insert("name".into(), json!(project.title));
    ld.insert("description".into(), json!(description));
    ld.insert(
        "author".into(),
        json!({
            "@type": "Person",
            "name": cfg.author,
            "url": cfg.base(),
        }),
    );
    ld.insert("url".into(), json!(url));
    ld.insert("image".into(), json!(image));
    if let Some(year) = project.year {
        ld.insert("dateCreated".into(), json!(format!("{}-01-01", year)));
    }
    if !project.tags.is_empty() {
        ld.insert("keywords".into(), json!(project.tags.join(", ")));
    }
    if let Some(overview) = project.overview() {
        ld.insert("about".into(), json!(overview));
    }
    if let Some(live) = project.live_link() {
        ld.insert(
            "mainEntityOfPage".into(),
            json!({ "@type": "WebPage", "url": live }),
        );
    }
    Value::Object(ld)
}

/// `Person` for the homepage.
pub fn person_jsonld(cfg: &SiteConfig) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": cfg.author,
        "jobTitle": cfg.job_title,
        "url": cfg.base(),
        "sameAs": cfg.same_as,
        "knowsAbout": cfg.knows_about,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_keys_are_omitted() {
        let cfg = SiteConfig::default();
        let p = Project {
            slug: "x".into(),
            title: "X".into(),
            ..Default::default()
        };
        let ld = project_jsonld(&cfg, &p, "d", "i", "u");
        assert!(ld.get("dateCreated").is_none());
        assert!(ld.get("mainEntityOfPage").is_none());
        assert_eq!(ld["author"]["@type"], "Person");
    }

    #[test]
    fn year_and_tags_fill_fields() {
        let cfg = SiteConfig::default();
        let p = Project {
            slug: "x".into(),
            title: "X".into(),
            year: Some(2021),
            tags: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let ld = project_jsonld(&cfg, &p, "d", "i", "u");
        assert_eq!(ld["dateCreated"], "2021-01-01");
        assert_eq!(ld["keywords"], "a, b");
    }
}
