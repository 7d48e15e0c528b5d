//! List rewrites applied to every event body.
//!
//! - [`fold_sources`] collapses the representative-sources entries behind a
//!   `<details>` disclosure.
//! - [`strip_topic_lines`] and [`strip_company_lines`] drop field lines that
//!   the company cards already show elsewhere.

use super::dom::{Element, Node};
use super::labels::{COMPANY_LINE, SOURCES_LABEL, SOURCES_LINE, TOPIC_LINE};
use regex::Regex;

fn top_level_items(list: &Element) -> impl Iterator<Item = (usize, &Element)> {
    list.children
        .iter()
        .enumerate()
        .filter_map(|(i, n)| n.as_element().filter(|e| e.is("li")).map(|e| (i, e)))
}

fn disclosure_item(count: usize, sources: Element) -> Node {
    let summary = Element::new("summary").with_text(&format!("{SOURCES_LABEL}（{count}）"));
    let details = Element::new("details")
        .with_attr("class", "sources")
        .with_children(vec![summary.into(), sources.into()]);
    Element::new("li").with_children(vec![details.into()]).into()
}

/// Fold the representative sources of a `<ul>`/`<ol>` into one collapsible
/// item.
///
/// Two shapes are recognised on the first item labelled `代表新聞`:
/// - the item holds a nested list, whose items become the disclosure body
///   (the nested list's tag and attributes are kept);
/// - the item is a bare label, and every following sibling item becomes the
///   disclosure body.
///
/// Items before the label are never touched. Without a label item the list
/// is returned unchanged.
pub fn fold_sources(list: &Element) -> Element {
    let Some((label_index, label)) =
        top_level_items(list).find(|(_, li)| SOURCES_LINE.is_match(&li.own_text()))
    else {
        return list.clone();
    };

    let mut folded = Element {
        tag: list.tag.clone(),
        attrs: list.attrs.clone(),
        children: list.children[..label_index].to_vec(),
    };

    if let Some(nested) = label.nested_list() {
        let count = top_level_items(nested).count();
        folded.children.push(disclosure_item(count, nested.clone()));
        folded
            .children
            .extend(list.children[label_index + 1..].iter().cloned());
    } else {
        let sources: Vec<Node> = top_level_items(list)
            .filter(|(i, _)| *i > label_index)
            .map(|(_, li)| Node::Element(li.clone()))
            .collect();
        let count = sources.len();
        let body = Element::new("ul").with_children(sources);
        folded.children.push(disclosure_item(count, body));
    }

    folded
}

fn strip_lines(list: &Element, pattern: &Regex) -> Element {
    Element {
        tag: list.tag.clone(),
        attrs: list.attrs.clone(),
        children: list
            .children
            .iter()
            .filter(|node| match node.as_element() {
                Some(li) if li.is("li") => !pattern.is_match(&li.text()),
                _ => true,
            })
            .cloned()
            .collect(),
    }
}

/// Drop every top-level item whose text starts with `主題：`.
pub fn strip_topic_lines(list: &Element) -> Element {
    strip_lines(list, &TOPIC_LINE)
}

/// Drop every top-level item whose text starts with `公司：`.
pub fn strip_company_lines(list: &Element) -> Element {
    strip_lines(list, &COMPANY_LINE)
}

/// Both strippers followed by the sources fold.
pub fn prepare_event_body(list: &Element) -> Element {
    fold_sources(&strip_company_lines(&strip_topic_lines(list)))
}
