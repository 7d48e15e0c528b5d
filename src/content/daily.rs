//! Daily radar report store.
//!
//! Reports live in one directory as `{slug}.md` files with YAML front
//! matter. The external markdown converter writes the rendered body next to
//! each one as `{slug}.html`; [`daily_page`] reads that file and runs it
//! through [`transform_daily_html`].

use crate::models::{DailyMeta, FrontMatter};
use crate::report::transform_daily_html;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// A report ready for its page shell.
#[derive(Debug)]
pub struct DailyPage {
    pub meta: DailyMeta,
    pub content_html: String,
}

/// Split `---` delimited YAML front matter off a markdown document.
///
/// Returns the raw YAML (if any) and the remaining body.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix("---") else {
        return (None, raw);
    };
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
        return (None, raw);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, raw)
}

/// Parse front matter, degrading to defaults when it is malformed.
pub fn parse_front_matter(raw: &str) -> FrontMatter {
    match split_front_matter(raw).0 {
        Some(yaml) => serde_yaml::from_str(yaml).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed front matter; using defaults");
            FrontMatter::default()
        }),
        None => FrontMatter::default(),
    }
}

pub fn meta_from_front_matter(slug: &str, fm: FrontMatter) -> DailyMeta {
    DailyMeta {
        slug: slug.to_string(),
        title: fm.title.unwrap_or_else(|| format!("台股事件雷達｜{slug}")),
        date: fm.date.unwrap_or_else(|| slug.to_string()),
    }
}

/// Stems of every `*.md` file in `dir`. A missing directory yields none.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub async fn daily_slugs(dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    if !fs::try_exists(dir).await? {
        debug!("Daily directory does not exist");
        return Ok(Vec::new());
    }
    let mut entries = fs::read_dir(dir).await?;
    let mut slugs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(slug) = name.strip_suffix(".md") {
            slugs.push(slug.to_string());
        }
    }
    slugs.sort();
    Ok(slugs)
}

async fn read_meta(dir: &Path, slug: &str) -> Result<DailyMeta, Box<dyn Error>> {
    let raw = fs::read_to_string(dir.join(format!("{slug}.md"))).await?;
    Ok(meta_from_front_matter(slug, parse_front_matter(&raw)))
}

/// Every report's metadata, newest date first.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn daily_list(dir: &Path) -> Result<Vec<DailyMeta>, Box<dyn Error>> {
    let mut items = Vec::new();
    for slug in daily_slugs(dir).await? {
        items.push(read_meta(dir, &slug).await?);
    }
    items.sort_by(|a, b| b.date.cmp(&a.date));
    info!(count = items.len(), "Listed daily reports");
    Ok(items)
}

pub async fn latest_daily(dir: &Path) -> Result<Option<DailyMeta>, Box<dyn Error>> {
    Ok(daily_list(dir).await?.into_iter().next())
}

/// Metadata from `{slug}.md` plus the transformed `{slug}.html` body.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %slug))]
pub async fn daily_page(dir: &Path, slug: &str) -> Result<DailyPage, Box<dyn Error>> {
    let meta = read_meta(dir, slug).await?;
    let html_path = dir.join(format!("{slug}.html"));
    let rendered = fs::read_to_string(&html_path).await.map_err(|e| {
        warn!(path = %html_path.display(), error = %e, "Rendered report body not found");
        e
    })?;
    Ok(DailyPage {
        meta,
        content_html: transform_daily_html(&rendered),
    })
}
