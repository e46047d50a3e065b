use serde_json::Value;

use crate::config::SiteConfig;
use crate::dom::html_escape;
use crate::models::project::Project;

use super::jsonld::{person_jsonld, project_jsonld};
use super::script_safe_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    Name,
    Property,
}

impl MetaAttr {
    /// Open Graph and Twitter keys use `property`, the rest `name`.
    pub fn for_key(key: &str) -> Self {
        if key.starts_with("og:") || key.starts_with("twitter:") {
            MetaAttr::Property
        } else {
            MetaAttr::Name
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            MetaAttr::Name => "name",
            MetaAttr::Property => "property",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaTag {
    pub attr: MetaAttr,
    pub key: String,
    pub content: String,
}

/// Document head state owned by the SEO writer. Every setter updates in
/// place, so applying the same input twice yields the same tags.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadTags {
    pub title: String,
    pub lang: String,
    metas: Vec<MetaTag>,
    canonical: Option<String>,
    json_ld: Option<Value>,
}

impl Default for HeadTags {
    fn default() -> Self {
        HeadTags::new()
    }
}

impl HeadTags {
    pub fn new() -> Self {
        let mut head = HeadTags {
            title: String::new(),
            lang: "en".to_string(),
            metas: Vec::new(),
            canonical: None,
            json_ld: None,
        };
        head.update_meta("viewport", "width=device-width, initial-scale=1.0");
        head.update_meta("robots", "index, follow");
        head
    }

    /// Empty content leaves the tag untouched.
    pub fn update_meta(&mut self, key: &str, content: &str) {
        if content.is_empty() {
            return;
        }
        match self.metas.iter_mut().find(|m| m.key == key) {
            Some(tag) => tag.content = content.to_string(),
            None => self.metas.push(MetaTag {
                attr: MetaAttr::for_key(key),
                key: key.to_string(),
                content: content.to_string(),
            }),
        }
    }

    pub fn set_canonical(&mut self, url: &str) {
        self.canonical = Some(url.to_string());
    }

    pub fn set_json_ld(&mut self, data: Value) {
        self.json_ld = Some(data);
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<meta charset=\"UTF-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", html_escape(&self.title)));
        for m in &self.metas {
            out.push_str(&format!(
                "<meta {}=\"{}\" content=\"{}\">\n",
                m.attr.as_str(),
                html_escape(&m.key),
                html_escape(&m.content)
            ));
        }
        if let Some(ref url) = self.canonical {
            out.push_str(&format!(
                "<link rel=\"canonical\" href=\"{}\">\n",
                html_escape(url)
            ));
        }
        if let Some(ref data) = self.json_ld {
            out.push_str(&format!(
                "<script type=\"application/ld+json\" id=\"json-ld\">\n{}\n</script>\n",
                script_safe_json(data)
            ));
        }
        out
    }
}

/// Read-back accessors for assertions on the collected tags.
#[cfg(test)]
impl HeadTags {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metas
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.content.as_str())
    }

    pub fn count(&self, key: &str) -> usize {
        self.metas.iter().filter(|m| m.key == key).count()
    }

    pub fn canonical(&self) -> Option<&str> {
        self.canonical.as_deref()
    }

    pub fn json_ld(&self) -> Option<&Value> {
        self.json_ld.as_ref()
    }
}

/// Derived social fields shared by the Open Graph and Twitter blocks.
struct Social<'a> {
    title: &'a str,
    description: &'a str,
    image: &'a str,
    url: &'a str,
    og_type: &'a str,
}

fn apply_social(head: &mut HeadTags, s: &Social<'_>, twitter: bool) {
    head.update_meta("og:title", s.title);
    head.update_meta("og:description", s.description);
    head.update_meta("og:image", s.image);
    head.update_meta("og:url", s.url);
    head.update_meta("og:type", s.og_type);
    if twitter {
        head.update_meta("twitter:card", "summary_large_image");
        head.update_meta("twitter:title", s.title);
        head.update_meta("twitter:description", s.description);
        head.update_meta("twitter:image", s.image);
        head.update_meta("twitter:url", s.url);
    }
}

pub struct SeoWriter<'a> {
    config: &'a SiteConfig,
}

impl<'a> SeoWriter<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        SeoWriter { config }
    }

    /// Description fallback: overview, then subtitle, then a generated line.
    pub fn project_description(&self, project: &Project) -> String {
        project
            .overview()
            .or_else(|| project.subtitle())
            .map(str::to_string)
            .unwrap_or_else(|| format!("A project by {}: {}", self.config.author, project.title))
    }

    pub fn project_url(&self, project: &Project) -> String {
        self.config.absolute_url(&format!("/{}", project.page_path()))
    }

    pub fn project_image(&self, project: &Project) -> String {
        let path = project
            .hero_image
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.config.social_image);
        self.config.absolute_url(path)
    }

    pub fn apply(&self, head: &mut HeadTags, project: &Project) {
        let title = format!("{} - {}", project.title, self.config.author);
        let description = self.project_description(project);
        let image = self.project_image(project);
        let url = self.project_url(project);

        head.title = title.clone();
        head.update_meta("description", &description);
        apply_social(
            head,
            &Social {
                title: &title,
                description: &description,
                image: &image,
                url: &url,
                og_type: "article",
            },
            true,
        );
        head.set_canonical(&url);
        head.set_json_ld(project_jsonld(self.config, project, &description, &image, &url));
    }

    pub fn apply_home(&self, head: &mut HeadTags) {
        let cfg = self.config;
        let title = format!("{} - {}", cfg.author, cfg.job_title);
        let image = cfg.absolute_url(&cfg.social_image);
        let url = cfg.base().to_string();

        head.title = title.clone();
        head.update_meta("description", &cfg.site_description);
        apply_social(
            head,
            &Social {
                title: &title,
                description: &cfg.site_description,
                image: &image,
                url: &url,
                og_type: "website",
            },
            true,
        );
        head.set_canonical(&url);
        head.set_json_ld(person_jsonld(cfg));
    }

    pub fn apply_not_found(&self, head: &mut HeadTags) {
        let cfg = self.config;
        let title = format!("Page Not Found - {}", cfg.author);
        let description = "The page you're looking for doesn't exist.";
        let image = cfg.absolute_url(&cfg.social_image);
        let url = cfg.absolute_url("/404.html");

        head.title = title.clone();
        head.update_meta("description", description);
        head.update_meta("robots", "noindex");
        apply_social(
            head,
            &Social {
                title: &title,
                description,
                image: &image,
                url: &url,
                og_type: "website",
            },
            false,
        );
    }
}
