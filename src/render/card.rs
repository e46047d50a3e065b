use crate::dom::{text_el, Element, Node};
use crate::models::project::Project;
use crate::render::{truncate, CardOptions};

/// Summary card for the homepage grid.
pub fn render_summary(project: &Project, opts: &CardOptions) -> Element {
    let overview = project.overview.as_deref().unwrap_or("");
    let subtitle = match project.subtitle() {
        Some(s) => s.to_string(),
        None => truncate(overview, opts.subtitle_len),
    };

    let image = Element::new("div").class("card__image-container").child(
        Element::new("img")
            .class("card__image")
            .attr(
                "src",
                project
                    .thumbnail
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or(&opts.placeholder_image),
            )
            .attr("alt", format!("{} project thumbnail", project.title))
            .attr("loading", "lazy")
            .attr("width", "400")
            .attr("height", "200"),
    );

    let mut tags = Element::new("div").class("card__tags");
    for tag in project.tags.iter().take(opts.tag_limit) {
        tags = tags.child(text_el("span", "tag", tag.as_str()));
    }
    if project.tags.len() > opts.tag_limit {
        tags = tags.child(text_el(
            "span",
            "tag tag--more",
            format!("+{} more", project.tags.len() - opts.tag_limit),
        ));
    }

    let primary = Element::new("a")
        .class("button button--primary card__action")
        .attr("href", format!("{}{}", opts.link_prefix, project.page_path()))
        .text("View Case Study");

    let mut secondary = Vec::new();
    if let Some(live) = project.live_link() {
        secondary.push(external_action(live, "Live Demo"));
    }
    if let Some(repo) = project.repo_link() {
        secondary.push(external_action(repo, "Code"));
    }

    let mut actions = Element::new("div").class("card__actions").child(primary);
    if !secondary.is_empty() {
        actions = actions.child(
            Element::new("div")
                .class("card__secondary-actions")
                .children(secondary),
        );
    }

    let content = Element::new("div")
        .class("card__content")
        .child(text_el("h3", "card__title", project.title.as_str()))
        .child(text_el("p", "card__subtitle", subtitle))
        .child(text_el(
            "p",
            "card__description",
            truncate(overview, opts.overview_len),
        ))
        .child(tags)
        .child(actions);

    Element::new("article")
        .class("card")
        .attr("data-project-slug", project.slug.as_str())
        .attr("data-tags", project.tags.join("|"))
        .attr("data-search", project.searchable_text())
        .attr("tabindex", "0")
        .child(image)
        .child(content)
}

fn external_action(href: &str, label: &str) -> Node {
    Element::new("a")
        .class("button button--secondary card__action")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .text(label)
        .into()
}
