//! Daily report post-processing.
//!
//! [`transform_daily_html`] takes the HTML produced by the external markdown
//! converter and restructures it for display. The stages run in a fixed
//! order because later stages match text written by earlier ones:
//!
//! 1. drop the run-log section and everything after it
//! 2. trim the summary list and append the high-confidence count placeholder
//! 3. relabel confidence codes
//! 4. condense the highest-heat event line
//! 5. rebuild the event ranking as company cards
//! 6. rebuild the company heat section as a ranked bar list
//! 7. backfill the placeholder from the finished document
//!
//! Every stage is a pass-through when its target is missing or fails to
//! parse; nothing here returns an error.
//!
//! # Submodules
//!
//! - [`dom`]: owned node tree, parsing and serialization
//! - [`labels`]: report vocabulary and compiled patterns
//! - [`sections`]: heading-delimited section lookup
//! - [`lists`]: sources folding and field-line stripping
//! - [`events`]: event parsing and company aggregation
//! - [`heat`]: company heat parsing and ranking
//! - [`summary`]: the text-level stages

pub mod dom;
pub mod events;
pub mod heat;
pub mod labels;
pub mod lists;
pub mod sections;
pub mod summary;

use crate::utils::truncate_for_log;
use dom::{parse_fragment, serialize, Element, Node};
use labels::{DEFAULT_HEAT_HEADING, HEAT_HEADING, RANKING_HEADING};
use sections::{locate_section, Section};
use tracing::{debug, info, instrument};

/// The section's own heading, or a same-level heading with `fallback` text
/// when it has no text of its own.
fn section_heading(nodes: &[Node], section: &Section, fallback: &str) -> Element {
    match section.heading(nodes) {
        Some(h) if !h.text().trim().is_empty() => h.clone(),
        _ => Element::new(&format!("h{}", section.level)).with_text(fallback),
    }
}

/// Stage 5. Returns the number of events regrouped.
pub fn rebuild_event_ranking(nodes: &mut Vec<Node>) -> usize {
    let Some(section) = locate_section(nodes, &[RANKING_HEADING]) else {
        debug!("No event ranking section");
        return 0;
    };
    let parsed = events::parse_events(section.body(nodes));
    if parsed.is_empty() {
        debug!("Event ranking left untouched: no events parsed");
        return 0;
    }
    let count = parsed.len();
    let groups = events::group_by_company(parsed);
    let heading = section_heading(nodes, &section, labels::DEFAULT_RANKING_HEADING);
    let rebuilt = events::render_company_cards(heading, &groups);
    nodes.splice(section.start..section.end, rebuilt);
    info!(events = count, companies = groups.len(), "Rebuilt event ranking");
    count
}

/// Stage 6. Returns the number of heat rows parsed.
pub fn rebuild_heat_ranking(nodes: &mut Vec<Node>) -> usize {
    let Some(section) = locate_section(nodes, &[HEAT_HEADING]) else {
        debug!("No company heat section");
        return 0;
    };
    let Some(rows) = heat::parse_heat_rows(section.body(nodes)) else {
        debug!("Company heat left untouched: no valid rows");
        return 0;
    };
    let count = rows.len();
    let heading = section_heading(nodes, &section, DEFAULT_HEAT_HEADING);
    let rebuilt = heat::render_heat_ranking(heading, rows);
    nodes.splice(section.start..section.end, rebuilt);
    info!(rows = count, "Rebuilt company heat ranking");
    count
}

/// Run the full post-processing pipeline over one rendered report.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn transform_daily_html(html: &str) -> String {
    debug!(preview = %truncate_for_log(html, 200), "Transforming daily report");
    let mut nodes = parse_fragment(html);

    if summary::truncate_run_log(&mut nodes) {
        debug!("Removed run log section");
    }
    if summary::trim_summary(&mut nodes) {
        debug!("Trimmed summary list");
    }
    summary::relabel_confidence_in(&mut nodes);
    summary::condense_top_event_in(&mut nodes);
    rebuild_event_ranking(&mut nodes);
    rebuild_heat_ranking(&mut nodes);

    let out = summary::backfill_high_confidence(&serialize(&nodes));
    info!(bytes_out = out.len(), "Daily report transformed");
    out
}
