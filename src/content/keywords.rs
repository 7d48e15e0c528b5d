//! Keyword taxonomy and hit statistics.
//!
//! The catalog is a fixed list of categories. [`build_keyword_hits`] scans
//! the daily report sources and records, per keyword, on how many report
//! days it appeared and when it was first and last seen. Matching is a plain
//! case-insensitive substring test over the raw markdown.

use crate::models::{ChangelogItem, KeywordCat, KeywordHit};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

pub const KEYWORDS_VERSION: &str = "v1.1.0";

/// Keyword to hit record, ordered by keyword.
pub type HitsIndex = BTreeMap<String, KeywordHit>;

fn cat(key: &str, title: &str, desc: &str, items: &[&str]) -> KeywordCat {
    KeywordCat {
        key: key.to_string(),
        title: title.to_string(),
        desc: Some(desc.to_string()),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

pub static KEYWORD_CATS: Lazy<Vec<KeywordCat>> = Lazy::new(|| {
    vec![
        cat(
            "packaging",
            "先進製程 / 封裝",
            "先進封裝、HBM、Chiplet、CoWoS 等。",
            &[
                "2奈米", "3DIC", "先進製程封裝", "CoWoS", "CoWoS-L", "CoWoS-S", "CoWoS-R", "SoIC",
                "FOPLP", "CoWoP", "Chiplet", "小晶片",
            ],
        ),
        cat(
            "interconnect",
            "高速互連 / 光",
            "CPO、光通訊、800G/1.6T、光模組。",
            &[
                "800G", "1.6T", "CPO", "光收發", "光模組", "交換器", "AEC", "PCIe", "InP", "磷化銦",
                "矽光子",
            ],
        ),
        cat(
            "power-dc",
            "電力 / 資料中心",
            "HVDC、BBU、UPS、機櫃電源與配電。",
            &[
                "HVDC", "UPS", "BBU", "Power shelf", "機櫃電源", "PDU", "整流器", "變壓器", "變電站",
                "電網", "儲能", "核電",
            ],
        ),
    ]
});

pub static KEYWORDS_CHANGELOG: Lazy<Vec<ChangelogItem>> = Lazy::new(|| {
    vec![ChangelogItem {
        date: "2026-02-09".to_string(),
        title: "公開 Keywords Index + 支援命中統計".to_string(),
        items: vec![
            "新增 /methodology/keywords 頁".to_string(),
            "支援搜尋、全展開、複製文字/JSON".to_string(),
            "新增命中統計：hitDays / firstSeen / lastSeen".to_string(),
        ],
    }]
});

/// Every keyword of the catalog, once, in catalog order.
pub fn all_keywords(cats: &[KeywordCat]) -> Vec<String> {
    cats.iter()
        .flat_map(|c| c.items.iter().cloned())
        .unique()
        .collect()
}

static DATE_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// `YYYY-MM-DD` stems only. The shape is checked, not the calendar, so
/// `2026-02-30` still counts as a report day.
fn date_from_slug(slug: &str) -> Option<String> {
    DATE_SLUG.is_match(slug).then(|| slug.to_string())
}

fn slug_from_filename(name: &str) -> Option<&str> {
    name.strip_suffix(".md").or_else(|| name.strip_suffix(".mdx"))
}

/// Record one report day's text against every keyword.
pub fn record_hits(hits: &mut HitsIndex, keywords: &[String], slug: &str, date: &str, text: &str) {
    let text = text.to_lowercase();
    for keyword in keywords {
        if !text.contains(&keyword.to_lowercase()) {
            continue;
        }
        let rec = hits
            .entry(keyword.clone())
            .or_insert_with(|| KeywordHit::empty(keyword));
        rec.hit_days += 1;
        if rec.first_seen.as_deref().is_none_or(|first| date < first) {
            rec.first_seen = Some(date.to_string());
        }
        if rec.last_seen.as_deref().is_none_or(|last| date > last) {
            rec.last_seen = Some(date.to_string());
            rec.last_seen_slug = Some(slug.to_string());
        }
    }
}

/// Scan `*.md`/`*.mdx` reports named by date and count keyword hits.
///
/// Every catalog keyword is present in the result, with zero hit days when
/// it never matched. A missing directory is not an error.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn build_keyword_hits(dir: &Path, cats: &[KeywordCat]) -> Result<HitsIndex, Box<dyn Error>> {
    let keywords = all_keywords(cats);
    let mut hits: HitsIndex = keywords
        .iter()
        .map(|k| (k.clone(), KeywordHit::empty(k)))
        .collect();

    let mut files: Vec<(String, String, PathBuf)> = Vec::new();
    match fs::read_dir(dir).await {
        Ok(mut entries) => {
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().to_string();
                let Some(slug) = slug_from_filename(&name) else {
                    continue;
                };
                let Some(date) = date_from_slug(slug) else {
                    debug!(file = %name, "Skipping report without a date name");
                    continue;
                };
                files.push((slug.to_string(), date, entry.path()));
            }
        }
        Err(e) => {
            warn!(error = %e, "Daily directory unreadable; no hits recorded");
            return Ok(hits);
        }
    }

    let texts: Vec<(String, String, String)> = stream::iter(files)
        .then(|(slug, date, path)| async move {
            match fs::read_to_string(&path).await {
                Ok(text) => Some((slug, date, text)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read report");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    for (slug, date, text) in &texts {
        record_hits(&mut hits, &keywords, slug, date, text);
    }
    info!(reports = texts.len(), keywords = keywords.len(), "Built keyword hits");
    Ok(hits)
}

/// Case-insensitive catalog search.
///
/// A category whose title or key matches is kept whole; otherwise only its
/// matching keywords are kept, and categories left empty are dropped.
pub fn filter_catalog(cats: &[KeywordCat], query: &str) -> Vec<KeywordCat> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return cats.to_vec();
    }
    cats.iter()
        .filter_map(|c| {
            if c.title.to_lowercase().contains(&q) || c.key.to_lowercase().contains(&q) {
                return Some(c.clone());
            }
            let items: Vec<String> = c
                .items
                .iter()
                .filter(|k| k.to_lowercase().contains(&q))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| KeywordCat {
                items,
                ..c.clone()
            })
        })
        .collect()
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CatalogStats {
    pub categories: usize,
    pub keywords: usize,
    pub hit_days: u32,
}

pub fn catalog_stats(cats: &[KeywordCat], hits: &HitsIndex) -> CatalogStats {
    CatalogStats {
        categories: cats.len(),
        keywords: cats.iter().map(|c| c.items.len()).sum(),
        hit_days: hits.values().map(|h| h.hit_days).sum(),
    }
}

/// `## title (n)` followed by `- item` lines, one block per category.
pub fn export_text(cats: &[KeywordCat]) -> String {
    cats.iter()
        .map(|c| {
            let lines = c.items.iter().map(|k| format!("- {k}")).join("\n");
            format!("## {} ({})\n{}", c.title, c.items.len(), lines)
        })
        .join("\n\n")
}

pub fn export_json(cats: &[KeywordCat]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(cats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("radar_notes_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_date_from_slug() {
        assert_eq!(date_from_slug("2026-02-09").as_deref(), Some("2026-02-09"));
        assert_eq!(date_from_slug("2026-2-9"), None);
        assert_eq!(date_from_slug("about"), None);
        assert_eq!(date_from_slug("2026-02-30").as_deref(), Some("2026-02-30"));
        assert_eq!(date_from_slug("2026-02-091"), None);
    }

    #[test]
    fn test_record_hits_tracks_first_and_last_seen() {
        let keywords = vec!["CoWoS".to_string(), "HVDC".to_string()];
        let mut hits = HitsIndex::new();
        record_hits(&mut hits, &keywords, "2026-02-09", "2026-02-09", "cowos 擴產");
        record_hits(&mut hits, &keywords, "2026-02-01", "2026-02-01", "CoWoS-L 與 hvdc");
        record_hits(&mut hits, &keywords, "2026-02-05", "2026-02-05", "nothing");

        let cowos = &hits["CoWoS"];
        assert_eq!(cowos.hit_days, 2);
        assert_eq!(cowos.first_seen.as_deref(), Some("2026-02-01"));
        assert_eq!(cowos.last_seen.as_deref(), Some("2026-02-09"));
        assert_eq!(cowos.last_seen_slug.as_deref(), Some("2026-02-09"));
        assert_eq!(hits["HVDC"].hit_days, 1);
    }

    #[tokio::test]
    async fn test_build_keyword_hits_scans_dated_reports() {
        let dir = scratch_dir("keyword_hits");
        std::fs::write(dir.join("2026-02-08.md"), "今日 CoWoS 與 BBU").unwrap();
        std::fs::write(dir.join("2026-02-09.mdx"), "cowos 再擴產").unwrap();
        std::fs::write(dir.join("draft.md"), "CoWoS HVDC").unwrap();

        let hits = build_keyword_hits(&dir, &KEYWORD_CATS).await.unwrap();
        assert_eq!(hits.len(), all_keywords(&KEYWORD_CATS).len());
        assert_eq!(hits["CoWoS"].hit_days, 2);
        assert_eq!(hits["CoWoS"].last_seen.as_deref(), Some("2026-02-09"));
        assert_eq!(hits["BBU"].hit_days, 1);
        assert_eq!(hits["HVDC"].hit_days, 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_build_keyword_hits_missing_directory() {
        let dir = std::env::temp_dir().join("radar_notes_no_such_dir_91c2");
        let hits = build_keyword_hits(&dir, &KEYWORD_CATS).await.unwrap();
        assert!(hits.values().all(|h| h.hit_days == 0));
    }

    #[test]
    fn test_filter_catalog() {
        assert_eq!(filter_catalog(&KEYWORD_CATS, "  ").len(), 3);

        let by_title = filter_catalog(&KEYWORD_CATS, "電力");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].items.len(), 12);

        let by_item = filter_catalog(&KEYWORD_CATS, "cowos-");
        assert_eq!(by_item.len(), 1);
        assert_eq!(by_item[0].items, vec!["CoWoS-L", "CoWoS-S", "CoWoS-R"]);

        assert!(filter_catalog(&KEYWORD_CATS, "不存在").is_empty());
    }

    #[test]
    fn test_catalog_stats_and_exports() {
        let mut hits = HitsIndex::new();
        record_hits(&mut hits, &["UPS".to_string()], "2026-02-09", "2026-02-09", "ups");
        let stats = catalog_stats(&KEYWORD_CATS, &hits);
        assert_eq!(stats, CatalogStats { categories: 3, keywords: 35, hit_days: 1 });

        let text = export_text(&KEYWORD_CATS[..1]);
        assert!(text.starts_with("## 先進製程 / 封裝 (12)\n- 2奈米\n- 3DIC"));

        let json = export_json(&KEYWORD_CATS).unwrap();
        assert!(json.contains("\"key\": \"power-dc\""));
    }
}
