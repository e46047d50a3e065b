use std::collections::HashSet;

use chrono::NaiveDate;

use crate::config::SiteConfig;
use crate::models::collection::ProjectCollection;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Generate sitemap.xml content.
/// Returns None if the sitemap is disabled.
pub fn generate_sitemap(
    cfg: &SiteConfig,
    projects: &ProjectCollection,
    lastmod: NaiveDate,
) -> Option<String> {
    if !cfg.sitemap {
        return None;
    }

    let lastmod = lastmod.format("%Y-%m-%d").to_string();
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
"#,
    );

    // Homepage
    xml.push_str(&format!(
        "  <url><loc>{}/</loc><lastmod>{}</lastmod><changefreq>weekly</changefreq><priority>1.0</priority></url>\n",
        xml_escape(cfg.base()),
        lastmod
    ));

    let mut listed = HashSet::new();
    for project in projects.iter().filter(|p| listed.insert(p.slug.as_str())) {
        xml.push_str(&format!(
            "  <url><loc>{}</loc><lastmod>{}</lastmod><priority>0.8</priority></url>\n",
            xml_escape(&cfg.absolute_url(&project.page_path())),
            lastmod
        ));
    }

    xml.push_str("</urlset>");
    Some(xml)
}

/// Generate robots.txt content with the sitemap URL when one is written.
pub fn generate_robots(cfg: &SiteConfig) -> String {
    let mut content = cfg.robots_txt.clone();
    if cfg.sitemap {
        content.push_str(&format!("\nSitemap: {}/sitemap.xml", cfg.base()));
    }
    content
}
