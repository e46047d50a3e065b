use crate::dom::{text_el, Element, Node};
use crate::filter::FilterState;
use crate::models::collection::ProjectCollection;
use crate::nav::{compute_adjacent, AdjacencyMode};
use crate::prefs::Theme;
use crate::render::card::render_summary;
use crate::render::{states, CardOptions};

/// `<select id="category-filter">` with "All Projects" (empty value) first.
pub fn render_category_filter(categories: &[String], selected: &str) -> Node {
    let option = |value: &str, label: &str| {
        let mut o = Element::new("option").attr("value", value).text(label);
        if value == selected {
            o.set_attr("selected", "");
        }
        o
    };
    Element::new("select")
        .id("category-filter")
        .class("filter__select")
        .attr("aria-label", "Filter by category")
        .child(option("", "All Projects"))
        .children(categories.iter().map(|c| option(c.as_str(), c.as_str())))
        .into()
}

pub fn render_search_input(term: &str) -> Node {
    Element::new("input")
        .id("search-filter")
        .class("filter__search")
        .attr("type", "search")
        .attr("placeholder", "Search projects...")
        .attr("aria-label", "Search projects")
        .attr("value", term)
        .into()
}

pub fn results_count(shown: usize, total: usize) -> Node {
    Element::new("p")
        .id("results-count")
        .class("filter__count")
        .attr("aria-live", "polite")
        .text(format!("Showing {} of {} projects", shown, total))
        .into()
}

/// Cards for `visible`, or the no-results panel when it is empty. Each card
/// carries its carousel neighbours, wrapping at both ends.
pub fn render_grid(visible: &ProjectCollection, opts: &CardOptions) -> Node {
    let mut grid = Element::new("div").id("projects-grid").class("projects-grid");
    if visible.is_empty() {
        return grid.child(states::no_results()).into();
    }
    for project in visible {
        let adjacent = compute_adjacent(visible, &project.slug, AdjacencyMode::Wrap);
        let mut card = render_summary(project, opts);
        if let Some(prev) = adjacent.prev {
            card.set_attr("data-prev", prev.slug.as_str());
        }
        if let Some(next) = adjacent.next {
            card.set_attr("data-next", next.slug.as_str());
        }
        grid = grid.child(card);
    }
    grid.into()
}

/// Count line followed by the grid. A non-empty grid also ships a hidden
/// copy of the no-results panel for the client filter to reveal.
pub fn render_listing(
    base: &ProjectCollection,
    visible: &ProjectCollection,
    opts: &CardOptions,
) -> Node {
    let mut parts = vec![
        results_count(visible.len(), base.len()),
        render_grid(visible, opts),
    ];
    if !visible.is_empty() {
        parts.push(
            Element::new("div")
                .id("no-results-template")
                .attr("hidden", "")
                .child(states::no_results())
                .into(),
        );
    }
    Node::Fragment(parts)
}

/// Filter controls bound to the current state.
pub fn render_filters(base: &ProjectCollection, state: &FilterState) -> (Node, Node) {
    (
        render_category_filter(&base.categories(), state.selected_category()),
        render_search_input(state.search_term()),
    )
}

/// Grid replacement when no collection could be loaded.
pub fn render_load_error() -> Node {
    Element::new("div")
        .id("projects-grid")
        .class("projects-grid")
        .child(states::load_error_panel())
        .into()
}

/// Toggle button; its label names the theme a click switches to.
pub fn render_theme_button(current: Theme) -> Node {
    Element::new("button")
        .id("theme-toggle")
        .class("theme-toggle")
        .attr("type", "button")
        .attr("aria-label", "Toggle dark mode")
        .attr("aria-pressed", if current == Theme::Dark { "true" } else { "false" })
        .child(text_el(
            "span",
            "theme-toggle__label",
            format!("{} mode", capitalize(current.toggled().as_str())),
        ))
        .into()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
