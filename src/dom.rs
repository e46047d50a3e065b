//! Minimal HTML tree. Renderers build `Node`s; committing a tree to a page
//! is a separate step (see `page`).

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Pre-rendered markup or script body, emitted verbatim.
    Raw(String),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: &str) -> Self {
        self.attr("id", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Replace an attribute in place or append it.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl Node {
    pub fn render(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&html_escape(t)),
            Node::Raw(r) => out.push_str(r),
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.render(out)),
            Node::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (k, v) in &e.attrs {
                    if v.is_empty() && (k == "hidden" || k == "selected") {
                        out.push_str(&format!(" {}", k));
                    } else {
                        out.push_str(&format!(" {}=\"{}\"", k, html_escape(v)));
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&e.tag.as_str()) {
                    return;
                }
                for c in &e.children {
                    c.render(out);
                }
                out.push_str(&format!("</{}>", e.tag));
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}

/// Tree queries used by assertions.
#[cfg(test)]
impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    fn child_nodes(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Fragment(nodes) => nodes,
            _ => &[],
        }
    }

    /// Depth-first search including `self`.
    pub fn find<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
        if let Node::Element(e) = self {
            if pred(e) {
                return Some(e);
            }
        }
        self.child_nodes().iter().find_map(|c| c.find(pred))
    }

    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect(pred, &mut out);
        out
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if let Node::Element(e) = self {
            if pred(e) {
                out.push(e);
            }
        }
        for c in self.child_nodes() {
            c.collect(pred, out);
        }
    }

    pub fn find_id(&self, id: &str) -> Option<&Element> {
        self.find(&|e| e.get_attr("id") == Some(id))
    }

    pub fn find_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(&|e| e.has_class(class))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Raw(_) => String::new(),
            _ => self.child_nodes().iter().map(Node::text_content).collect(),
        }
    }
}

#[cfg(test)]
impl Element {
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|x| x == class))
            .unwrap_or(false)
    }

    pub fn is_hidden(&self) -> bool {
        self.get_attr("hidden").is_some()
    }
}

/// `<tag class="..">text</tag>`
pub fn text_el(tag: &str, class: &str, text: impl Into<String>) -> Element {
    Element::new(tag).class(class).text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_escaped_text_and_attrs() {
        let node: Node = Element::new("a")
            .attr("href", "/x?a=1&b=\"2\"")
            .text("<Tom & Jerry>")
            .into();
        assert_eq!(
            node.to_html(),
            "<a href=\"/x?a=1&amp;b=&quot;2&quot;\">&lt;Tom &amp; Jerry&gt;</a>"
        );
    }

    #[test]
    fn void_and_boolean_attrs() {
        let node: Node = Element::new("div")
            .attr("hidden", "")
            .child(Element::new("img").attr("src", "a.png"))
            .into();
        assert_eq!(node.to_html(), "<div hidden><img src=\"a.png\"></div>");
    }

    #[test]
    fn set_attr_replaces_existing() {
        let mut e = Element::new("p").class("a");
        e.set_attr("class", "b");
        assert_eq!(e.attrs.len(), 1);
        assert!(e.has_class("b"));
    }

    #[test]
    fn find_and_text_content() {
        let node: Node = Element::new("div")
            .child(Element::new("span").id("x").text("hi"))
            .child(Node::Raw("<b>raw</b>".into()))
            .text(" there")
            .into();
        assert_eq!(node.find_id("x").map(|e| e.tag.as_str()), Some("span"));
        assert_eq!(node.text_content(), "hi there");
    }
}
