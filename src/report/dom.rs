//! Owned HTML node tree used by the report rewrite passes.
//!
//! Input HTML is parsed once with [`scraper`] (html5ever in fragment mode)
//! and converted into plain [`Node`] values that the passes in this module's
//! siblings can freely clone, splice and rebuild. The tree is serialized back
//! to a string exactly once, at the end of the pipeline.

use crate::utils::{escape_attr, escape_html};
use scraper::{ElementRef, Html};

/// Elements that never carry a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose end marks a line boundary in [`block_text`].
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "table",
    "blockquote", "pre", "section", "details", "summary",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
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

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn is_list(&self) -> bool {
        self.is("ul") || self.is("ol")
    }

    /// Heading rank (1 for `h1` .. 6 for `h6`), `None` for anything else.
    pub fn heading_level(&self) -> Option<u8> {
        let tag = self.tag.to_ascii_lowercase();
        match tag.as_bytes() {
            [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
            _ => None,
        }
    }

    /// Text content with all markup stripped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out, false);
        out
    }

    /// Text content excluding any nested `<ul>`/`<ol>`.
    pub fn own_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out, true);
        out
    }

    /// Direct child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First direct child list (`<ul>` or `<ol>`).
    pub fn nested_list(&self) -> Option<&Element> {
        self.child_elements().find(|e| e.is_list())
    }

    /// Depth-first search for the first descendant matching `pred`.
    pub fn find<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
        find_in(&self.children, pred)
    }

    #[cfg(test)]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// True for text nodes holding nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    pub fn text(&self) -> String {
        match self {
            Node::Element(e) => e.text(),
            Node::Text(t) => t.clone(),
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

fn collect_text(nodes: &[Node], out: &mut String, skip_lists: bool) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) if skip_lists && e.is_list() => {}
            Node::Element(e) => collect_text(&e.children, out, skip_lists),
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(e) = node {
            if pred(e) {
                return Some(e);
            }
            if let Some(found) = find_in(&e.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn find_all_in<'a>(nodes: &'a [Node], pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
    for node in nodes {
        if let Node::Element(e) = node {
            if pred(e) {
                out.push(e);
            } else {
                find_all_in(&e.children, pred, out);
            }
        }
    }
}

/// First element matching `pred` anywhere in `nodes`.
pub fn find_first<'a>(nodes: &'a [Node], pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
    find_in(nodes, pred)
}

/// Every element matching `pred` anywhere in `nodes`, outermost first.
pub fn find_every<'a>(nodes: &'a [Node], pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
    let mut out = Vec::new();
    find_all_in(nodes, pred, &mut out);
    out
}

/// Apply `f` to every element in the tree, parents before children.
pub fn walk_elements_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut Element)) {
    for node in nodes {
        if let Node::Element(e) = node {
            f(e);
            walk_elements_mut(&mut e.children, f);
        }
    }
}

/// Apply `f` to every text node in the tree.
pub fn walk_text_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut String)) {
    for node in nodes {
        match node {
            Node::Text(t) => f(t),
            Node::Element(e) => walk_text_mut(&mut e.children, f),
        }
    }
}

/// Text of a node sequence with line breaks at `<br>` and at the end of
/// block elements, so that the result can be split into lines.
pub fn block_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_block_text(nodes, &mut out);
    out
}

fn collect_block_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) if e.is("br") => out.push('\n'),
            Node::Element(e) => {
                let block = BLOCK_ELEMENTS.iter().any(|b| e.is(b));
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                collect_block_text(&e.children, out);
                if block && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
}

/// Parse an HTML fragment into owned nodes.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    convert_children(fragment.root_element())
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    parent
        .children()
        .filter_map(|child| match child.value() {
            scraper::Node::Text(text) => {
                let content: &str = text;
                Some(Node::Text(content.to_owned()))
            }
            scraper::Node::Element(_) => ElementRef::wrap(child).map(convert_element),
            _ => None,
        })
        .collect()
}

fn convert_element(element: ElementRef<'_>) -> Node {
    let value = element.value();
    Node::Element(Element {
        tag: value.name().to_string(),
        attrs: value
            .attrs()
            .map(|(name, val)| (name.to_string(), val.to_string()))
            .collect(),
        children: convert_children(element),
    })
}

/// Serialize nodes back to HTML.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&escape_html(t)),
        Node::Element(e) => write_element(e, out),
    }
}

fn write_element(e: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&e.tag);
    for (name, value) in &e.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
    if VOID_ELEMENTS.iter().any(|v| e.is(v)) {
        return;
    }
    if e.is("script") || e.is("style") {
        for child in &e.children {
            if let Node::Text(t) = child {
                out.push_str(t);
            }
        }
    } else {
        for child in &e.children {
            write_node(child, out);
        }
    }
    out.push_str("</");
    out.push_str(&e.tag);
    out.push('>');
}
