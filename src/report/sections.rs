//! Locate a named section among the top-level nodes of a report.
//!
//! A section starts at a heading whose text contains every required
//! substring and runs up to, but not including, the next heading of the same
//! or a higher rank (`h2` stops at `h1`/`h2`, not at `h3`).

use super::dom::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Index of the heading node.
    pub start: usize,
    /// One past the last node of the section.
    pub end: usize,
    pub level: u8,
}

impl Section {
    /// The nodes following the heading.
    pub fn body<'a>(&self, nodes: &'a [Node]) -> &'a [Node] {
        &nodes[self.start + 1..self.end]
    }

    pub fn heading<'a>(&self, nodes: &'a [Node]) -> Option<&'a Element> {
        nodes.get(self.start).and_then(Node::as_element)
    }
}

fn heading_level(node: &Node) -> Option<u8> {
    node.as_element().and_then(Element::heading_level)
}

/// Find the first heading whose stripped text contains all of `required`.
///
/// Returns `None` when no heading matches; callers leave the document alone
/// in that case.
pub fn locate_section(nodes: &[Node], required: &[&str]) -> Option<Section> {
    let (start, level) = nodes.iter().enumerate().find_map(|(i, node)| {
        let level = heading_level(node)?;
        let text = node.text();
        required
            .iter()
            .all(|needle| text.contains(needle))
            .then_some((i, level))
    })?;

    let end = nodes[start + 1..]
        .iter()
        .position(|n| heading_level(n).is_some_and(|l| l <= level))
        .map(|offset| start + 1 + offset)
        .unwrap_or(nodes.len());

    Some(Section { start, end, level })
}
