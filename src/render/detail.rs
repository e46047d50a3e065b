use crate::dom::{text_el, Element, Node};
use crate::models::project::{non_empty, GalleryImage, Project, TextBlock};

/// A narrative section that has content for the current project.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub id: &'static str,
    pub title: &'static str,
    pub body: Node,
}

impl RenderedSection {
    pub fn to_node(&self) -> Node {
        Element::new("section")
            .class("project-section")
            .id(self.id)
            .child(text_el("h2", "project-section__title", self.title))
            .child(
                Element::new("div")
                    .class("project-section__content")
                    .id(&format!("{}-content", self.id))
                    .child(self.body.clone()),
            )
            .into()
    }
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub header: Node,
    /// Only sections with content, in page order.
    pub sections: Vec<RenderedSection>,
}

impl DetailView {
    pub fn sections_node(&self) -> Node {
        Node::Fragment(self.sections.iter().map(RenderedSection::to_node).collect())
    }

    #[cfg(test)]
    pub fn section_ids(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.id).collect()
    }
}

/// Header plus the fixed sequence of optional sections. A section whose
/// backing field is missing or empty is left out entirely.
pub fn render_detail(project: &Project) -> DetailView {
    let builders: [(&'static str, &'static str, fn(&Project) -> Option<Node>); 8] = [
        ("overview", "Overview", overview),
        ("problem-goals", "Problem & Goals", problem_goals),
        ("research-ux", "Research & UX", research),
        ("design", "Design", design),
        ("build", "Build", build),
        ("demo-code", "Demo & Code", demo),
        ("outcomes", "Outcomes", outcomes),
        ("gallery", "Gallery", gallery),
    ];

    let sections = builders
        .iter()
        .filter_map(|&(id, title, render)| {
            render(project).map(|body| RenderedSection {
                id,
                title,
                body,
            })
        })
        .collect();

    DetailView {
        header: header(project),
        sections,
    }
}

fn header(project: &Project) -> Node {
    let mut meta = Element::new("div").class("project-header__meta");
    let year = project.year.map(|y| y.to_string());
    for (id, label, value) in [
        ("project-role", "Role", non_empty(&project.role)),
        ("project-year", "Year", year.as_deref()),
        ("project-status", "Status", non_empty(&project.status)),
    ] {
        if let Some(value) = value {
            meta = meta.child(
                Element::new("div")
                    .class("project-header__meta-item")
                    .child(text_el("span", "project-header__meta-label", label))
                    .child(Element::new("span").id(id).text(value)),
            );
        }
    }

    let mut header = Element::new("header")
        .class("project-header")
        .child(Element::new("h1").id("project-title").text(project.title.as_str()));
    if let Some(subtitle) = project.subtitle() {
        header = header.child(Element::new("p").id("project-subtitle").text(subtitle));
    }
    header = header.child(meta);

    if !project.tags.is_empty() {
        header = header.child(
            Element::new("div")
                .id("project-tags")
                .class("project-header__tags")
                .children(project.tags.iter().map(|t| text_el("span", "tag", t.as_str()))),
        );
    }

    let links: Vec<Node> = [
        (project.live_link(), "button button--primary", "Live Demo"),
        (project.repo_link(), "button button--secondary", "View Code"),
        (project.figma_link(), "button button--secondary", "Figma"),
    ]
    .into_iter()
    .filter_map(|(href, class, label)| {
        href.map(|h| {
            Element::new("a")
                .class(class)
                .attr("href", h)
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .text(label)
                .into()
        })
    })
    .collect();
    if !links.is_empty() {
        header = header.child(
            Element::new("div")
                .id("project-links")
                .class("project-header__links")
                .children(links),
        );
    }

    let hero = match non_empty(&project.hero_image) {
        Some(src) => Element::new("img")
            .attr("src", src)
            .attr("alt", format!("{} hero image", project.title))
            .attr("loading", "lazy")
            .into(),
        None => Node::from(text_el("div", "project-hero__placeholder", "No image available")),
    };
    header
        .child(
            Element::new("div")
                .id("project-hero-image")
                .class("project-hero")
                .child(hero),
        )
        .into()
}

fn paragraph(text: &str) -> Node {
    Element::new("p").text(text).into()
}

fn bullet_list<'a>(items: impl IntoIterator<Item = &'a String>) -> Node {
    Element::new("ul")
        .children(
            items
                .into_iter()
                .filter(|i| !i.trim().is_empty())
                .map(|i| Element::new("li").text(i.as_str())),
        )
        .into()
}

fn text_block(block: &TextBlock) -> Node {
    match block {
        TextBlock::Text(t) => paragraph(t),
        TextBlock::List(items) => bullet_list(items),
    }
}

fn image_gallery(images: &[GalleryImage]) -> Node {
    Element::new("div")
        .class("gallery")
        .children(images.iter().map(|img| {
            let mut item = Element::new("div").class("gallery__item").child(
                Element::new("img")
                    .class("gallery__image")
                    .attr("src", img.src.as_str())
                    .attr("alt", img.alt.as_str())
                    .attr("loading", "lazy"),
            );
            if let Some(caption) = non_empty(&img.caption) {
                item = item.child(text_el("div", "gallery__caption", caption));
            }
            item
        }))
        .into()
}

fn overview(p: &Project) -> Option<Node> {
    p.overview().map(paragraph)
}

fn problem_goals(p: &Project) -> Option<Node> {
    let mut parts: Vec<Node> = Vec::new();
    if let Some(problem) = p.problem.as_ref().filter(|b| !b.is_empty()) {
        parts.push(
            Element::new("div")
                .id("problem-content")
                .child(text_el("h3", "project-section__subtitle", "Problem"))
                .child(Element::new("div").id("problem-text").child(text_block(problem)))
                .into(),
        );
    }
    if p.goals.iter().any(|g| !g.trim().is_empty()) {
        parts.push(
            Element::new("div")
                .id("goals-content")
                .child(text_el("h3", "project-section__subtitle", "Goals"))
                .child(Element::new("div").id("goals-text").child(bullet_list(&p.goals)))
                .into(),
        );
    }
    (!parts.is_empty()).then(|| Node::Fragment(parts))
}

fn research(p: &Project) -> Option<Node> {
    p.research
        .as_ref()
        .filter(|b| !b.is_empty())
        .map(text_block)
}

fn design(p: &Project) -> Option<Node> {
    let d = p.design.as_ref()?;
    let mut parts: Vec<Node> = Vec::new();
    if let Some(desc) = non_empty(&d.description) {
        parts.push(paragraph(desc));
    }
    if !d.images.is_empty() {
        parts.push(image_gallery(&d.images));
    }
    (!parts.is_empty()).then(|| Node::Fragment(parts))
}

fn build(p: &Project) -> Option<Node> {
    let b = p.build.as_ref()?;
    let mut parts: Vec<Node> = Vec::new();
    if let Some(desc) = non_empty(&b.description) {
        parts.push(paragraph(desc));
    }
    if b.features.iter().any(|f| !f.trim().is_empty()) {
        parts.push(bullet_list(&b.features));
    }
    (!parts.is_empty()).then(|| Node::Fragment(parts))
}

fn demo(p: &Project) -> Option<Node> {
    non_empty(&p.demo).map(paragraph)
}

fn outcomes(p: &Project) -> Option<Node> {
    let tiles: Vec<Element> = p
        .outcomes
        .iter()
        .filter_map(|o| o.metric())
        .map(|(value, label)| {
            Element::new("div")
                .class("outcome-metric")
                .child(text_el("div", "outcome-metric__value", value))
                .child(text_el("div", "outcome-metric__label", label))
        })
        .collect();
    (!tiles.is_empty()).then(|| Element::new("div").class("outcomes").children(tiles).into())
}

fn gallery(p: &Project) -> Option<Node> {
    (!p.gallery.is_empty()).then(|| image_gallery(&p.gallery))
}
