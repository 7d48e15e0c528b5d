//! Text-level passes around the two section rebuilds: run-log removal,
//! summary trimming, confidence relabelling, the highest-heat line and the
//! final high-confidence count.

use super::dom::{walk_elements_mut, walk_text_mut, Element, Node};
use super::labels::{
    CONFIDENCE_CODE, CONFIDENCE_SOURCE, CONFIDENCE_TARGET, CONFIDENCE_UNKNOWN, COUNT_PLACEHOLDER,
    HIGH_CONFIDENCE_MARK, HIGH_CONFIDENCE_SUMMARY_LABEL, RUN_LOG_HEADING, SUMMARY_HEADING,
    SUMMARY_KEEP, TOP_EVENT_LABEL, TOP_EVENT_LINE,
};
use super::sections::locate_section;
use crate::models::ConfidenceLevel;
use regex::Captures;

/// Drop the run-log heading and everything after it.
pub fn truncate_run_log(nodes: &mut Vec<Node>) -> bool {
    match locate_section(nodes, &[RUN_LOG_HEADING]) {
        Some(section) => {
            nodes.truncate(section.start);
            true
        }
        None => false,
    }
}

/// Keep only the event-count and highest-heat items of the summary list and
/// append the high-confidence count item, whose value is backfilled last.
pub fn trim_summary(nodes: &mut [Node]) -> bool {
    let Some(section) = locate_section(nodes, &[SUMMARY_HEADING]) else {
        return false;
    };
    let Some(list) = nodes[section.start + 1..section.end]
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|e| e.is_list())
    else {
        return false;
    };

    list.children.retain(|node| match node.as_element() {
        Some(li) if li.is("li") => SUMMARY_KEEP.is_match(&li.text()),
        _ => true,
    });
    list.children.push(
        Element::new("li")
            .with_text(&format!("{HIGH_CONFIDENCE_SUMMARY_LABEL}：{COUNT_PLACEHOLDER}"))
            .into(),
    );
    true
}

/// Map a confidence code to its label; a missing code reads as unknown.
pub fn confidence_label(code: Option<i64>) -> &'static str {
    code.map(|c| ConfidenceLevel::from_code(c).label())
        .unwrap_or(CONFIDENCE_UNKNOWN)
}

/// Rewrite `高信心：N` into `信心：高|中|低`, then any remaining bare
/// `高信心` into `信心`.
pub fn relabel_confidence(text: &str) -> String {
    let coded = CONFIDENCE_CODE.replace_all(text, |caps: &Captures| {
        let code = caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok());
        format!("{CONFIDENCE_TARGET}：{}", confidence_label(code))
    });
    coded.replace(CONFIDENCE_SOURCE, CONFIDENCE_TARGET)
}

pub fn relabel_confidence_in(nodes: &mut [Node]) {
    walk_text_mut(nodes, &mut |text| {
        if text.contains(CONFIDENCE_SOURCE) {
            *text = relabel_confidence(text);
        }
    });
}

/// `event｜topic｜company｜heat` becomes `event｜company｜heat`; text with
/// fewer than three parts is left alone.
pub fn condense_top_event(text: &str) -> Option<String> {
    let label = TOP_EVENT_LINE.find(text)?;
    let parts: Vec<&str> = text[label.end()..]
        .split(['｜', '|'])
        .map(str::trim)
        .collect();
    if parts.len() < 3 {
        return None;
    }
    let n = parts.len();
    Some(format!(
        "{TOP_EVENT_LABEL}：{}｜{}｜{}",
        parts[0],
        parts[n - 2],
        parts[n - 1]
    ))
}

pub fn condense_top_event_in(nodes: &mut [Node]) {
    walk_elements_mut(nodes, &mut |e| {
        if !e.is("li") {
            return;
        }
        if let Some(condensed) = condense_top_event(e.text().trim()) {
            e.children = vec![Node::Text(condensed)];
        }
    });
}

/// Replace the placeholder with the number of `信心：高` marks in `html`.
pub fn backfill_high_confidence(html: &str) -> String {
    if !html.contains(COUNT_PLACEHOLDER) {
        return html.to_string();
    }
    let count = html.matches(HIGH_CONFIDENCE_MARK).count();
    html.replace(COUNT_PLACEHOLDER, &count.to_string())
}
