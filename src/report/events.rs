//! Event-ranking section: parse numbered events and regroup them by company.
//!
//! Parsing tries two strategies in order and keeps the first non-empty
//! result:
//! 1. [`parse_structured`]: `<h3>` (or any heading) immediately followed by a
//!    list, which is what the markdown converter produces for the exporter's
//!    output.
//! 2. [`parse_plain_text`]: the section flattened to lines and cut into
//!    blocks at every `N)` line, for reports whose lists did not survive
//!    conversion.
//!
//! Company and heat are always read from the unmodified list text, before the
//! strippers delete the lines they live on.

use super::dom::{block_text, Element, Node};
use super::labels::{
    strip_numbering, BULLET, COMPANY_FIELD, HEAT_FIELD, NUMBERING, SOURCES_LABEL, SOURCES_LINE,
    UNKNOWN_COMPANY,
};
use super::lists::prepare_event_body;
use crate::models::{CompanyGroup, EventRecord};
use crate::utils::collapse_whitespace;
use tracing::debug;

fn extract_company(text: &str) -> Option<String> {
    COMPANY_FIELD
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|c| !c.is_empty())
}

fn extract_heat(text: &str) -> Option<f64> {
    HEAT_FIELD
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|h| h.is_finite() && *h >= 0.0)
}

/// Line-per-item text of a list, so that the line-anchored company pattern
/// sees each item on its own line.
fn list_lines(list: &Element) -> String {
    block_text(&list.children)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_event(title: String, list: &Element) -> EventRecord {
    let text = list_lines(list);
    EventRecord {
        title,
        company: extract_company(&text),
        heat: extract_heat(&text),
        body: prepare_event_body(list),
    }
}

/// Every heading directly followed (whitespace aside) by a list.
pub fn parse_structured(section: &[Node]) -> Vec<EventRecord> {
    let elements: Vec<&Element> = section
        .iter()
        .filter(|n| !n.is_blank())
        .filter_map(Node::as_element)
        .collect();

    elements
        .windows(2)
        .filter(|pair| pair[0].heading_level().is_some() && pair[1].is_list())
        .map(|pair| build_event(collapse_whitespace(&pair[0].text()), pair[1]))
        .collect()
}

/// Cut the flattened section into `N)`-numbered blocks and rebuild each one
/// as a list.
pub fn parse_plain_text(section: &[Node]) -> Vec<EventRecord> {
    let text = block_text(section);
    let lines: Vec<String> = text
        .lines()
        .map(|l| BULLET.replace(l.trim(), "").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    let mut blocks: Vec<Vec<String>> = Vec::new();
    for line in lines {
        if NUMBERING.is_match(&line) {
            blocks.push(vec![line]);
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    blocks.into_iter().map(|block| block_to_event(&block)).collect()
}

fn block_to_event(block: &[String]) -> EventRecord {
    let title = strip_numbering(&block[0]);
    let rest = &block[1..];
    let split = rest.iter().position(|l| SOURCES_LINE.is_match(l));
    let (main, sources) = match split {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };

    let mut items: Vec<Node> = main
        .iter()
        .map(|line| Element::new("li").with_text(line).into())
        .collect();
    if let Some(sources) = sources {
        items.push(Element::new("li").with_text(&format!("{SOURCES_LABEL}：")).into());
        items.extend(
            sources
                .iter()
                .map(|line| Element::new("li").with_text(line).into()),
        );
    }
    let list = Element::new("ul").with_children(items);

    let joined = block.join("\n");
    EventRecord {
        title,
        company: extract_company(&joined),
        heat: extract_heat(&joined),
        body: prepare_event_body(&list),
    }
}

/// Structured parse first, plain-text blocks when that finds nothing.
pub fn parse_events(section: &[Node]) -> Vec<EventRecord> {
    let structured = parse_structured(section);
    if !structured.is_empty() {
        debug!(count = structured.len(), "Parsed events from heading/list pairs");
        return structured;
    }
    let plain = parse_plain_text(section);
    debug!(count = plain.len(), "Parsed events from numbered text blocks");
    plain
}

/// Group by company in first-seen order, then sort by each group's highest
/// heat, descending. The sort is stable, so equal maxima keep first-seen
/// order.
pub fn group_by_company(events: Vec<EventRecord>) -> Vec<CompanyGroup> {
    let mut groups = events
        .into_iter()
        .fold(Vec::<CompanyGroup>::new(), |mut acc, event| {
            let key = event
                .company
                .clone()
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
            match acc.iter_mut().find(|g| g.company == key) {
                Some(group) => group.events.push(event),
                None => acc.push(CompanyGroup {
                    company: key,
                    events: vec![event],
                }),
            }
            acc
        });

    groups.sort_by(|a, b| b.max_heat().total_cmp(&a.max_heat()));
    groups
}

fn company_card(group: &CompanyGroup) -> Node {
    let header = Element::new("div")
        .with_attr("class", "company-card-header")
        .with_children(vec![
            Element::new("strong").with_text(&group.company).into(),
            Element::new("span")
                .with_attr("class", "company-card-count")
                .with_text(&format!("事件 {}", group.count()))
                .into(),
            Element::new("span")
                .with_attr("class", "company-card-heat")
                .with_text(&format!("最高熱度 {:.2}", group.max_heat()))
                .into(),
        ]);

    let mut children: Vec<Node> = vec![header.into()];
    for event in &group.events {
        let block = Element::new("div")
            .with_attr("class", "company-event")
            .with_children(vec![
                Element::new("h4").with_text(&strip_numbering(&event.title)).into(),
                event.body.clone().into(),
            ]);
        children.push(block.into());
    }

    Element::new("div")
        .with_attr("class", "company-card")
        .with_children(children)
        .into()
}

/// Heading plus one card per company, in ranking order.
pub fn render_company_cards(heading: Element, groups: &[CompanyGroup]) -> Vec<Node> {
    let mut out: Vec<Node> = vec![heading.into()];
    out.extend(groups.iter().map(company_card));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::dom::{parse_fragment, serialize};

    const STRUCTURED: &str = "<h3>1) 擴產 <strong>NEW</strong></h3>
<ul>
<li>極性：正</li>
<li>主題：先進封裝</li>
<li>公司：台積電</li>
<li>熱度：12.5（Δ1.2）｜篇數：4｜高信心：2</li>
<li>代表新聞：
<ol>
<li><a href=\"https://example.com/a\">標題A</a>（經濟日報｜2026-02-09）</li>
<li><a href=\"https://example.com/b\">標題B</a>（工商時報｜2026-02-09）</li>
</ol>
</li>
</ul>
<h3>2) 法說會</h3>
<ul>
<li>公司：聯發科</li>
<li>熱度：20</li>
</ul>";

    fn event(company: Option<&str>, heat: Option<f64>, title: &str) -> EventRecord {
        EventRecord {
            title: title.to_string(),
            body: Element::new("ul"),
            company: company.map(str::to_string),
            heat,
        }
    }

    #[test]
    fn test_parse_structured_reads_fields_before_stripping() {
        let nodes = parse_fragment(STRUCTURED);
        let events = parse_events(&nodes);
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first.title, "1) 擴產 NEW");
        assert_eq!(first.company.as_deref(), Some("台積電"));
        assert_eq!(first.heat, Some(12.5));

        let body = first.body_html();
        assert!(!body.contains("公司："));
        assert!(!body.contains("主題："));
        assert!(body.contains("極性：正"));
        assert!(body.contains("代表新聞（2）"));
        assert!(body.find("標題A").unwrap() < body.find("標題B").unwrap());

        assert_eq!(events[1].company.as_deref(), Some("聯發科"));
        assert_eq!(events[1].heat, Some(20.0));
    }

    #[test]
    fn test_parse_plain_text_fallback() {
        let html = "<p>前言不屬於任何事件</p>\
<p>1) 擴產<br>公司：台積電<br>主題：先進封裝<br>熱度：8（Δ0）<br>代表新聞：<br>來源一 &lt;b&gt;<br>來源二</p>\
<p>2) 減產<br>熱度：3</p>";
        let nodes = parse_fragment(html);
        assert!(parse_structured(&nodes).is_empty());

        let events = parse_events(&nodes);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "擴產");
        assert_eq!(events[0].company.as_deref(), Some("台積電"));
        assert_eq!(events[0].heat, Some(8.0));

        let body = events[0].body_html();
        assert!(!body.contains("公司："));
        assert!(!body.contains("主題："));
        assert!(body.contains("<li>熱度：8（Δ0）</li>"));
        assert!(body.contains("代表新聞（2）"));
        assert!(body.contains("<li>來源一 &lt;b&gt;</li>"));

        assert_eq!(events[1].company, None);
        assert_eq!(events[1].heat, Some(3.0));
    }

    #[test]
    fn test_parse_without_numbered_lines_is_empty() {
        let nodes = parse_fragment("<p>今日沒有事件排行資料。</p>");
        assert!(parse_events(&nodes).is_empty());
    }

    #[test]
    fn test_heat_is_taken_from_first_match_in_block() {
        // A heat pattern inside a source line is attributed to the event when
        // it precedes the event's own heat line.
        let html = "<p>1) 擴產<br>代表新聞：<br>熱度：99 的報導<br></p>";
        let events = parse_events(&parse_fragment(html));
        assert_eq!(events[0].heat, Some(99.0));
    }

    #[test]
    fn test_group_by_company_orders_by_max_heat() {
        let groups = group_by_company(vec![
            event(Some("X"), Some(5.0), "1) a"),
            event(Some("X"), Some(2.0), "2) b"),
            event(Some("Y"), Some(9.0), "3) c"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].company, "Y");
        assert_eq!(groups[1].company, "X");
        assert_eq!(groups[1].count(), 2);
        assert_eq!(format!("{:.2}", groups[1].max_heat()), "5.00");
    }

    #[test]
    fn test_group_by_company_is_stable_and_uses_sentinel() {
        let groups = group_by_company(vec![
            event(None, None, "1) a"),
            event(Some("B"), Some(0.0), "2) b"),
            event(None, Some(0.0), "3) c"),
        ]);
        assert_eq!(groups[0].company, UNKNOWN_COMPANY);
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[1].company, "B");
    }

    #[test]
    fn test_empty_company_field_falls_back_to_sentinel() {
        let structured = parse_fragment(
            "<h3>1) 擴產</h3><ul><li>極性：正</li><li>公司：</li><li>熱度：5（Δ1）｜篇數：2</li></ul>",
        );
        let events = parse_events(&structured);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].company, None);
        assert_eq!(events[0].heat, Some(5.0));

        let plain = parse_fragment("<p>1) 擴產<br>公司：<br>熱度：5</p>");
        let events = parse_events(&plain);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].company, None);
        assert_eq!(events[0].heat, Some(5.0));

        let groups = group_by_company(events);
        assert_eq!(groups[0].company, UNKNOWN_COMPANY);
    }

    #[test]
    fn test_render_company_cards() {
        let groups = group_by_company(vec![
            event(Some("X"), Some(5.0), "1) 擴產"),
            event(Some("X"), Some(2.0), "2) 減產"),
            event(Some("Y"), Some(9.0), "3) 併購"),
        ]);
        let heading = Element::new("h2").with_text("事件排行");
        let html = serialize(&render_company_cards(heading, &groups));
        assert!(html.starts_with("<h2>事件排行</h2>"));
        assert!(html.find("<strong>Y</strong>").unwrap() < html.find("<strong>X</strong>").unwrap());
        assert!(html.contains("事件 2"));
        assert!(html.contains("最高熱度 5.00"));
        assert!(html.contains("<h4>擴產</h4>"));
        assert!(!html.contains("1) 擴產"));
    }
}
