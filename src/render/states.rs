use crate::dom::{text_el, Element, Node};

/// Marker the filter script and the controller both key off to reset.
pub const CLEAR_FILTERS_ACTION: &str = "clear-filters";
pub const RETRY_ACTION: &str = "retry";

pub fn no_results() -> Node {
    Element::new("div")
        .class("no-results")
        .attr("role", "status")
        .child(text_el("h3", "no-results__title", "No projects found"))
        .child(text_el(
            "p",
            "no-results__text",
            "Try adjusting your search or filter criteria",
        ))
        .child(
            Element::new("button")
                .class("button button--secondary")
                .attr("type", "button")
                .attr("data-action", CLEAR_FILTERS_ACTION)
                .text("Clear Filters"),
        )
        .into()
}

pub fn load_error_panel() -> Node {
    Element::new("div")
        .class("error-state")
        .attr("role", "alert")
        .child(text_el("h3", "error-state__title", "Unable to load projects"))
        .child(text_el(
            "p",
            "error-state__text",
            "Please check your internet connection and try again",
        ))
        .child(
            Element::new("button")
                .class("button button--primary")
                .attr("type", "button")
                .attr("data-action", RETRY_ACTION)
                .text("Retry"),
        )
        .into()
}

fn status_body(code: &str, title: &str, message: &str) -> Node {
    Element::new("main")
        .class("status-page")
        .child(text_el("p", "status-page__code", code))
        .child(text_el("h1", "status-page__title", title))
        .child(text_el("p", "status-page__text", message))
        .child(
            Element::new("div")
                .class("status-page__actions")
                .child(
                    Element::new("a")
                        .class("button button--primary")
                        .attr("href", "/")
                        .text("Go Home"),
                )
                .child(
                    Element::new("a")
                        .class("button button--secondary")
                        .attr("href", "/#projects")
                        .text("View Projects"),
                ),
        )
        .into()
}

/// Shown for an unknown slug or a missing page.
pub fn not_found_page() -> Node {
    status_body(
        "404",
        "Project Not Found",
        "The project you're looking for doesn't exist or has been moved.",
    )
}

/// Shown when a detail page cannot get any data at all.
pub fn error_page() -> Node {
    status_body(
        "Error",
        "Something went wrong",
        "Unable to load the project. Please try again later.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_results_carries_reset_hook() {
        let node = no_results();
        let button = node
            .find(&|e| e.get_attr("data-action") == Some(CLEAR_FILTERS_ACTION))
            .unwrap();
        assert_eq!(button.tag, "button");
        assert!(node.text_content().contains("No projects found"));
    }

    #[test]
    fn load_error_retry_is_a_delegated_hook() {
        let node = load_error_panel();
        let button = node
            .find(&|e| e.get_attr("data-action") == Some(RETRY_ACTION))
            .unwrap();
        assert_eq!(button.tag, "button");
        assert!(node.text_content().contains("Retry"));
        assert!(!node.to_html().contains("onclick"));
    }

    #[test]
    fn status_pages_link_home() {
        let html = not_found_page().to_html();
        assert!(html.contains("Project Not Found"));
        assert!(html.contains("href=\"/\""));
        assert!(error_page().text_content().contains("Something went wrong"));
    }
}
