//! Static page shells around the rendered content.
//!
//! Each function returns a complete HTML document. All record text is
//! escaped here; the only pre-rendered HTML injected verbatim is the
//! transformed daily report body.

use crate::content::daily::DailyPage;
use crate::content::notes::HIGH_WEIGHT;
use crate::models::{DailyMeta, Note};
use crate::utils::{escape_attr, escape_html};

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-Hant">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

/// `daily.html`: one link card per report, newest first. Links are relative
/// to the site root, matching the layout `build` writes.
pub fn daily_index_page(items: &[DailyMeta]) -> String {
    let mut body = String::new();
    body.push_str("<main class=\"daily-index\">\n<h1>Daily Radar</h1>\n");
    for it in items {
        body.push_str(&format!(
            "<a class=\"daily-card\" href=\"daily/{slug}.html\"><div class=\"daily-title\">{title}</div><div class=\"daily-date\">{date}</div></a>\n",
            slug = escape_attr(&it.slug),
            title = escape_html(&it.title),
            date = escape_html(&it.date),
        ));
    }
    body.push_str("</main>");
    document("Daily Radar", &body)
}

/// `daily/{slug}.html`: the transformed report body.
pub fn daily_page(page: &DailyPage) -> String {
    let body = format!(
        "<main class=\"daily\">\n<a href=\"../daily.html\">← Back</a>\n<h1>{title}</h1>\n<div class=\"daily-date\">{date}</div>\n<article>\n{content}\n</article>\n</main>",
        title = escape_html(&page.meta.title),
        date = escape_html(&page.meta.date),
        content = page.content_html,
    );
    document(&page.meta.title, &body)
}

fn weight_badge(weight: Option<f64>) -> String {
    match weight {
        Some(w) => {
            let class = if w >= HIGH_WEIGHT { "weight high" } else { "weight" };
            format!("<span class=\"{class}\">W {w}</span>")
        }
        None => String::new(),
    }
}

fn note_card(note: &Note, heading: &str) -> String {
    let tags: String = note
        .tags
        .iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", escape_html(t)))
        .collect();
    format!(
        "<a class=\"note-card\" href=\"notes/{slug}.html\"><{h}>{title}</{h}>{badge}<p>{summary}</p><div class=\"tags\">{tags}</div><div class=\"note-date\">{date}</div></a>\n",
        slug = escape_attr(&note.slug),
        h = heading,
        title = escape_html(&note.title),
        badge = weight_badge(note.weight),
        summary = escape_html(&note.summary),
        tags = tags,
        date = escape_html(&note.date),
    )
}

/// `notes.html`: the high-priority view followed by every note in research order.
pub fn notes_page(high_priority: &[Note], ranked: &[Note]) -> String {
    let mut body = String::from("<main class=\"notes\">\n<section>\n<h1>高權重事件（現在最重要）</h1>\n");
    if high_priority.is_empty() {
        body.push_str("<p>目前沒有達到高權重門檻的事件。</p>\n");
    }
    for note in high_priority {
        body.push_str(&note_card(note, "h2"));
    }
    body.push_str("</section>\n<section>\n<h2>全部事件（依重要性排序）</h2>\n");
    for note in ranked {
        body.push_str(&note_card(note, "h3"));
    }
    body.push_str("</section>\n</main>");
    document("Notes", &body)
}

/// `notes/{slug}.html`, or a not-found page when the note is missing.
pub fn note_page(slug: &str, note: Option<&Note>) -> String {
    let Some(note) = note else {
        let body = format!(
            "<main class=\"note\">\n<a href=\"../notes.html\">回 Notes</a>\n<h1>找不到這篇筆記</h1>\n<p>slug: {}</p>\n</main>",
            escape_html(slug)
        );
        return document("找不到這篇筆記", &body);
    };

    let mut facets = Vec::new();
    if let Some(theme) = &note.theme {
        facets.push(format!("Theme: {}", escape_html(theme)));
    }
    if let Some(sub) = &note.sub_theme {
        facets.push(format!("Sub: {}", escape_html(sub)));
    }
    if let Some(w) = note.weight {
        facets.push(format!("Weight: {w}"));
    }
    let tags: String = note
        .tags
        .iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", escape_html(t)))
        .collect();
    let paragraphs: String = note
        .body
        .iter()
        .map(|p| format!("<p>{}</p>\n", escape_html(p)))
        .collect();

    let body = format!(
        "<main class=\"note\">\n<a href=\"../notes.html\">回 Notes</a>\n<header>\n<h1>{title}</h1>\n<div><span class=\"note-date\">{date}</span>{tags}</div>\n{facets}</header>\n<article>\n{paragraphs}</article>\n</main>",
        title = escape_html(&note.title),
        date = escape_html(&note.date),
        tags = tags,
        facets = if facets.is_empty() {
            String::new()
        } else {
            format!("<div class=\"facets\">{}</div>\n", facets.join(" · "))
        },
        paragraphs = paragraphs,
    );
    document(&note.title, &body)
}
