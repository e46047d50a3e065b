use crate::dom::{text_el, Element, Node};
use crate::models::collection::ProjectCollection;
use crate::models::project::Project;
use crate::render::detail::RenderedSection;

/// Boundary behaviour for prev/next links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyMode {
    /// Homepage carousel: first and last connect.
    Wrap,
    /// Detail pages: no link past either end.
    Clip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Adjacent<'a> {
    pub prev: Option<&'a Project>,
    pub next: Option<&'a Project>,
}

impl Adjacent<'_> {
    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

/// Neighbours of `current_slug`. A collection of one (or an unknown slug)
/// has no neighbours in either mode.
pub fn compute_adjacent<'a>(
    collection: &'a ProjectCollection,
    current_slug: &str,
    mode: AdjacencyMode,
) -> Adjacent<'a> {
    let len = collection.len();
    let index = match collection.position(current_slug) {
        Some(i) if len > 1 => i,
        _ => return Adjacent::default(),
    };
    match mode {
        AdjacencyMode::Clip => Adjacent {
            prev: index.checked_sub(1).and_then(|i| collection.get(i)),
            next: collection.get(index + 1),
        },
        AdjacencyMode::Wrap => Adjacent {
            prev: collection.get((index + len - 1) % len),
            next: collection.get((index + 1) % len),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub anchor: String,
}

/// One entry per rendered section, in page order.
pub fn build_toc(sections: &[RenderedSection]) -> Vec<TocEntry> {
    sections
        .iter()
        .map(|s| TocEntry {
            title: s.title.to_string(),
            anchor: s.id.to_string(),
        })
        .collect()
}

pub fn render_toc(entries: &[TocEntry], active: Option<&str>) -> Node {
    Element::new("ul")
        .id("toc-list")
        .class("toc__list")
        .children(entries.iter().map(|e| {
            let class = if active == Some(e.anchor.as_str()) {
                "toc__link toc__link--active"
            } else {
                "toc__link"
            };
            Element::new("li").class("toc__item").child(
                Element::new("a")
                    .class(class)
                    .attr("href", format!("#{}", e.anchor))
                    .text(e.title.as_str()),
            )
        }))
        .into()
}

/// Footer with previous/next links. A missing neighbour's control is
/// emitted `hidden`; with no neighbours the whole footer is hidden.
pub fn render_nav_footer(adjacent: &Adjacent<'_>) -> Node {
    let link = |id: &str, title_id: &str, label: &str, project: Option<&Project>| {
        let mut a = Element::new("a").id(id).class("project-nav__link");
        match project {
            Some(p) => {
                a = a
                    .attr("href", format!("{}.html", p.slug))
                    .child(text_el("span", "project-nav__label", label))
                    .child(Element::new("span").id(title_id).text(p.title.as_str()));
            }
            None => a = a.attr("hidden", ""),
        }
        a
    };

    let mut footer = Element::new("nav")
        .id("project-nav-footer")
        .class("project-nav")
        .attr("aria-label", "Project navigation")
        .child(link("prev-project", "prev-project-title", "Previous", adjacent.prev))
        .child(link("next-project", "next-project-title", "Next", adjacent.next));
    if adjacent.is_empty() {
        footer.set_attr("hidden", "");
    }
    footer.into()
}

/// Vertical observation band expressed as viewport margins, in the same
/// terms as an intersection observer `rootMargin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpyBand {
    pub top_margin: f64,
    pub bottom_margin: f64,
}

impl Default for SpyBand {
    fn default() -> Self {
        SpyBand {
            top_margin: 0.2,
            bottom_margin: 0.7,
        }
    }
}

impl SpyBand {
    /// `(top, bottom)` of the band in viewport pixels.
    #[cfg(test)]
    pub fn range(&self, viewport_height: f64) -> (f64, f64) {
        (
            viewport_height * self.top_margin,
            viewport_height * (1.0 - self.bottom_margin),
        )
    }

    pub fn root_margin(&self) -> String {
        format!(
            "-{}% 0px -{}% 0px",
            (self.top_margin * 100.0).round(),
            (self.bottom_margin * 100.0).round()
        )
    }
}

/// Section position relative to the top of the viewport.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct SectionBounds<'a> {
    pub id: &'a str,
    pub top: f64,
    pub bottom: f64,
}

/// Marks at most one TOC entry active: the last section observed
/// intersecting the band. When nothing intersects, the previous choice
/// stays. Detail pages run the same rule in the browser through
/// `render::scripts::scroll_spy_script`; this is its model for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScrollSpy {
    band: SpyBand,
    active: Option<String>,
}

#[cfg(test)]
impl ScrollSpy {
    pub fn new(band: SpyBand) -> Self {
        ScrollSpy { band, active: None }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn observe(&mut self, sections: &[SectionBounds<'_>], viewport_height: f64) -> Option<&str> {
        let (band_top, band_bottom) = self.band.range(viewport_height);
        if let Some(hit) = sections
            .iter()
            .filter(|s| s.top < band_bottom && s.bottom > band_top)
            .last()
        {
            self.active = Some(hit.id.to_string());
        }
        self.active.as_deref()
    }
}
