//! Company-heat section: parse rows in one of three formats and render them
//! as a ranked bar list.
//!
//! | Strategy | Input shape |
//! |----------|-------------|
//! | [`parse_table`] | an HTML `<table>` |
//! | [`parse_pipe_table`] | markdown pipe rows left as plain text by the converter |
//! | [`parse_list`] | `<li>` items carrying `公司：X` and `熱度：Y` |
//!
//! The first strategy yielding at least one valid row wins.

use super::dom::{block_text, find_every, find_first, Element, Node};
use super::labels::{is_company_header, is_heat_header, ITEM_COMPANY, ITEM_HEAT};
use crate::models::HeatRow;
use crate::utils::{collapse_whitespace, parse_heat_value};
use tracing::debug;

/// Rows shown in the ranking.
pub const TOP_N: usize = 20;

/// Column indices used when no header identifies them.
const DEFAULT_COLUMNS: (usize, usize) = (0, 1);

fn column_indices(header: &[String]) -> (usize, usize) {
    let company = header
        .iter()
        .position(|h| is_company_header(h))
        .unwrap_or(DEFAULT_COLUMNS.0);
    let heat = header
        .iter()
        .position(|h| is_heat_header(h))
        .unwrap_or(DEFAULT_COLUMNS.1);
    (company, heat)
}

fn build_row(cells: Vec<String>, (company_ix, heat_ix): (usize, usize)) -> Option<HeatRow> {
    let company = cells.get(company_ix)?.trim().to_string();
    if company.is_empty() {
        return None;
    }
    let heat = parse_heat_value(cells.get(heat_ix)?)?;
    Some(HeatRow {
        company,
        heat,
        cells,
    })
}

fn row_cells(tr: &Element) -> Vec<String> {
    tr.child_elements()
        .filter(|c| c.is("td") || c.is("th"))
        .map(|c| collapse_whitespace(&c.text()))
        .collect()
}

/// Read the first `<table>` in the section.
///
/// Header cells come from `<thead>`; without one, the first row is a header
/// only when the table has more than one row.
pub fn parse_table(section: &[Node]) -> Vec<HeatRow> {
    let Some(table) = find_first(section, &|e| e.is("table")) else {
        return Vec::new();
    };

    let thead = table.find(&|e| e.is("thead"));
    let header_row = thead.and_then(|h| h.find(&|e| e.is("tr")));
    let body_rows: Vec<&Element> = table
        .child_elements()
        .filter(|e| !e.is("thead"))
        .flat_map(|e| {
            if e.is("tr") {
                vec![e]
            } else {
                e.child_elements().filter(|r| r.is("tr")).collect()
            }
        })
        .collect();

    let (header, data): (Vec<String>, &[&Element]) = match header_row {
        Some(tr) => (row_cells(tr), &body_rows[..]),
        None if body_rows.len() > 1 => (row_cells(body_rows[0]), &body_rows[1..]),
        None => (Vec::new(), &body_rows[..]),
    };

    let columns = column_indices(&header);
    data.iter()
        .filter_map(|tr| build_row(row_cells(tr), columns))
        .collect()
}

fn split_pipe_line(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(collapse_whitespace).collect()
}

/// Find a `| 公司 | 熱度 | ... |` header followed by a `---` separator and
/// read rows until the first line without a pipe.
pub fn parse_pipe_table(section: &[Node]) -> Vec<HeatRow> {
    let text = block_text(section);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some(header_ix) = lines.iter().position(|l| {
        l.contains('|') && is_company_header(l) && is_heat_header(l)
    }) else {
        return Vec::new();
    };
    if !lines
        .get(header_ix + 1)
        .is_some_and(|sep| sep.contains("---"))
    {
        return Vec::new();
    }

    let columns = column_indices(&split_pipe_line(lines[header_ix]));
    lines[header_ix + 2..]
        .iter()
        .take_while(|l| l.contains('|'))
        .filter_map(|l| build_row(split_pipe_line(l), columns))
        .collect()
}

/// Every `<li>` whose text has both a `公司：` and a numeric `熱度：` field.
pub fn parse_list(section: &[Node]) -> Vec<HeatRow> {
    find_every(section, &|e| e.is("li"))
        .into_iter()
        .filter_map(|li| {
            let text = collapse_whitespace(&li.text());
            let company = ITEM_COMPANY.captures(&text)?[1].trim().to_string();
            let heat = parse_heat_value(&ITEM_HEAT.captures(&text)?[1])?;
            if company.is_empty() {
                return None;
            }
            let cells = text
                .split(['｜', '|'])
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            Some(HeatRow {
                company,
                heat,
                cells,
            })
        })
        .collect()
}

/// Run the three strategies in order; `None` when none yields a row.
pub fn parse_heat_rows(section: &[Node]) -> Option<Vec<HeatRow>> {
    let strategies: [(&str, fn(&[Node]) -> Vec<HeatRow>); 3] = [
        ("table", parse_table),
        ("pipe", parse_pipe_table),
        ("list", parse_list),
    ];
    strategies.iter().find_map(|(name, parse)| {
        let rows = parse(section);
        if rows.is_empty() {
            return None;
        }
        debug!(strategy = *name, count = rows.len(), "Parsed company heat rows");
        Some(rows)
    })
}

/// Bar width in percent of the largest shown heat, never below 2.
pub fn bar_width(heat: f64, max_heat: f64) -> u32 {
    ((heat / max_heat) * 100.0).round().max(2.0) as u32
}

/// Highest heat first (stable), at most [`TOP_N`] rows.
pub fn rank_rows(mut rows: Vec<HeatRow>) -> Vec<HeatRow> {
    rows.sort_by(|a, b| b.heat.total_cmp(&a.heat));
    rows.truncate(TOP_N);
    rows
}

fn ranking_item(rank: usize, row: &HeatRow, max_heat: f64) -> Node {
    let width = bar_width(row.heat, max_heat);
    let bar = Element::new("span")
        .with_attr("class", "heat-bar")
        .with_children(vec![Element::new("span")
            .with_attr("class", "heat-bar-fill")
            .with_attr("style", &format!("width:{width}%"))
            .into()]);
    let details = Element::new("details").with_children(vec![
        Element::new("summary").with_text("明細").into(),
        Element::new("div")
            .with_attr("class", "heat-detail")
            .with_text(&row.cells.join(" ｜ "))
            .into(),
    ]);

    Element::new("li")
        .with_attr("class", "heat-row")
        .with_children(vec![
            Element::new("span")
                .with_attr("class", "heat-rank")
                .with_text(&rank.to_string())
                .into(),
            Element::new("span")
                .with_attr("class", "heat-company")
                .with_text(&row.company)
                .into(),
            bar.into(),
            Element::new("span")
                .with_attr("class", "heat-value")
                .with_text(&format!("{:.2}", row.heat))
                .into(),
            details.into(),
        ])
        .into()
}

/// Heading plus the ranked list of the top rows.
pub fn render_heat_ranking(heading: Element, rows: Vec<HeatRow>) -> Vec<Node> {
    let shown = rank_rows(rows);
    let max_heat = shown.iter().map(|r| r.heat).fold(1.0, f64::max);
    let items = shown
        .iter()
        .enumerate()
        .map(|(i, row)| ranking_item(i + 1, row, max_heat))
        .collect();
    vec![
        heading.into(),
        Element::new("ol")
            .with_attr("class", "heat-ranking")
            .with_children(items)
            .into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::dom::{parse_fragment, serialize};

    const TABLE: &str = "<table><thead><tr><th>公司</th><th>熱度</th><th>出現篇數</th></tr></thead>\
<tbody><tr><td>台積電</td><td>12.5</td><td>8</td></tr>\
<tr><td>聯發科</td><td>7</td><td>3</td></tr>\
<tr><td></td><td>5</td><td>1</td></tr>\
<tr><td>鴻海</td><td>n/a</td><td>1</td></tr></tbody></table>";

    const PIPE: &str = "<p>| 公司 | 熱度 | 出現篇數 |\n|---|---:|---:|\n| 台積電 | 12.5 | 8 |\n| 聯發科 | 7 | 3 |\n|  | 5 | 1 |\n| 鴻海 | n/a | 1 |</p><p>以上為今日資料</p>";

    fn row(company: &str, heat: f64) -> HeatRow {
        HeatRow {
            company: company.to_string(),
            heat,
            cells: vec![company.to_string(), heat.to_string()],
        }
    }

    #[test]
    fn test_parse_table_drops_invalid_rows() {
        let rows = parse_table(&parse_fragment(TABLE));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company, "台積電");
        assert_eq!(rows[0].heat, 12.5);
        assert_eq!(rows[0].cells, vec!["台積電", "12.5", "8"]);
    }

    #[test]
    fn test_parse_table_header_columns_are_detected() {
        let html = "<table><tr><th>排名</th><th>熱度</th><th>Company</th></tr>\
<tr><td>1</td><td>9</td><td>廣達</td></tr></table>";
        let rows = parse_table(&parse_fragment(html));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "廣達");
        assert_eq!(rows[0].heat, 9.0);
    }

    #[test]
    fn test_parse_table_single_row_is_data() {
        let rows = parse_table(&parse_fragment("<table><tr><td>緯創</td><td>4</td></tr></table>"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "緯創");
    }

    #[test]
    fn test_pipe_table_matches_table_parse() {
        let nodes = parse_fragment(PIPE);
        assert!(parse_table(&nodes).is_empty());
        let from_pipe = parse_heat_rows(&nodes).unwrap();
        let from_table = parse_table(&parse_fragment(TABLE));
        assert_eq!(from_pipe, from_table);
    }

    #[test]
    fn test_pipe_table_requires_separator() {
        let nodes = parse_fragment("<p>| 公司 | 熱度 |\n| 台積電 | 12 |</p>");
        assert!(parse_pipe_table(&nodes).is_empty());
    }

    #[test]
    fn test_parse_list_fallback() {
        let html = "<ul><li>公司：台積電｜熱度：12.5｜篇數：3</li><li>沒有欄位</li><li>公司：聯發科｜熱度：無</li></ul>";
        let rows = parse_heat_rows(&parse_fragment(html)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "台積電");
        assert_eq!(rows[0].heat, 12.5);
        assert_eq!(rows[0].cells, vec!["公司：台積電", "熱度：12.5", "篇數：3"]);
    }

    #[test]
    fn test_parse_heat_rows_none_when_nothing_valid() {
        let nodes = parse_fragment("<blockquote><p>今日沒有公司熱度資料。</p></blockquote>");
        assert_eq!(parse_heat_rows(&nodes), None);
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(10.0, 10.0), 100);
        assert_eq!(bar_width(5.0, 10.0), 50);
        assert_eq!(bar_width(0.01, 10.0), 2);
    }

    #[test]
    fn test_rank_rows_keeps_top_twenty_stably() {
        let mut rows: Vec<HeatRow> = (0..25).map(|i| row(&format!("c{i}"), i as f64)).collect();
        rows.push(row("tie", 24.0));
        let ranked = rank_rows(rows);
        assert_eq!(ranked.len(), TOP_N);
        assert_eq!(ranked[0].company, "c24");
        assert_eq!(ranked[1].company, "tie");
    }

    #[test]
    fn test_render_heat_ranking() {
        let rows: Vec<HeatRow> = (1..=25).map(|i| row(&format!("c{i}"), i as f64)).collect();
        let heading = Element::new("h2").with_text("公司熱度（CompanyHeat｜Top 20）");
        let html = serialize(&render_heat_ranking(heading, rows));
        assert!(html.starts_with("<h2>公司熱度（CompanyHeat｜Top 20）</h2>"));
        assert_eq!(html.matches("class=\"heat-row\"").count(), 20);
        assert!(html.contains("width:100%"));
        assert!(html.contains("25.00"));
        assert!(!html.contains(">c5<"));
    }

    #[test]
    fn test_render_heat_ranking_floors_max_heat_at_one() {
        let html = serialize(&render_heat_ranking(Element::new("h2"), vec![row("a", 0.5)]));
        assert!(html.contains("width:50%"));
    }
}
