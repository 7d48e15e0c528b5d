//! Data models shared by the report transformer and the content stores.
//!
//! This module defines the core data structures used throughout the application:
//! - [`EventRecord`], [`CompanyGroup`], [`HeatRow`]: transient records built while
//!   rewriting one daily report; none of them outlive a single render call
//! - [`ConfidenceLevel`]: the three-level label derived from a numeric code
//! - [`DailyMeta`], [`FrontMatter`]: daily report listing metadata
//! - [`Note`]: a hand-written research note
//! - [`KeywordCat`], [`KeywordHit`], [`ChangelogItem`]: the keyword taxonomy

use crate::report::dom::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One numbered event parsed out of the event-ranking section.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Heading text with markup stripped (numbering prefix still present).
    pub title: String,
    /// Display list with the company and topic lines removed and the
    /// representative sources folded.
    pub body: Element,
    /// Value of the `公司：` line, if any.
    pub company: Option<String>,
    /// First `熱度：<number>` value found anywhere in the event's text.
    pub heat: Option<f64>,
}

#[cfg(test)]
impl EventRecord {
    pub fn body_html(&self) -> String {
        self.body.to_html()
    }
}

/// Events sharing one company, in the order they were first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyGroup {
    pub company: String,
    pub events: Vec<EventRecord>,
}

impl CompanyGroup {
    pub fn count(&self) -> usize {
        self.events.len()
    }

    /// Highest heat in the group; events without a heat count as zero.
    pub fn max_heat(&self) -> f64 {
        self.events
            .iter()
            .map(|e| e.heat.unwrap_or(0.0))
            .fold(0.0, f64::max)
    }
}

/// One row of the company-heat section.
///
/// `company` is never empty and `heat` is always finite; rows that fail
/// either rule are dropped while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatRow {
    pub company: String,
    pub heat: f64,
    /// Every source cell/field text, kept for the detail panel.
    pub cells: Vec<String>,
}

/// Qualitative confidence derived from an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// `>= 2` is high, `1` is medium, anything lower is low.
    pub fn from_code(code: i64) -> Self {
        match code {
            c if c >= 2 => ConfidenceLevel::High,
            1 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "高",
            ConfidenceLevel::Medium => "中",
            ConfidenceLevel::Low => "低",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// YAML front matter written at the top of each daily report.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub range_days: Option<u32>,
    pub exclude_companies: Vec<String>,
}

/// Listing metadata for one daily report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMeta {
    pub slug: String,
    pub title: String,
    /// `YYYY-MM-DD`, falls back to the slug.
    pub date: String,
}

/// A hand-written research note.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub slug: String,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub theme: Option<String>,
    pub sub_theme: Option<String>,
    pub weight: Option<f64>,
    pub body: Vec<String>,
}

/// A keyword category of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCat {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub items: Vec<String>,
}

/// How often a keyword appeared across the daily reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordHit {
    pub keyword: String,
    pub hit_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_slug: Option<String>,
}

impl KeywordHit {
    pub fn empty(keyword: &str) -> Self {
        KeywordHit {
            keyword: keyword.to_string(),
            hit_days: 0,
            first_seen: None,
            last_seen: None,
            last_seen_slug: None,
        }
    }
}

/// One release note of the keyword taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct ChangelogItem {
    pub date: String,
    pub title: String,
    pub items: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(company: &str, heat: Option<f64>) -> EventRecord {
        EventRecord {
            title: "1) 擴產".to_string(),
            body: Element::new("ul"),
            company: Some(company.to_string()),
            heat,
        }
    }

    #[test]
    fn test_confidence_from_code() {
        assert_eq!(ConfidenceLevel::from_code(2), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_code(7), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_code(1), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_code(0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_code(-3), ConfidenceLevel::Low);
    }

    #[test]
    fn test_confidence_ordering_and_labels() {
        assert!(ConfidenceLevel::High > ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium > ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::High.to_string(), "高");
        assert_eq!(ConfidenceLevel::Low.label(), "低");
    }

    #[test]
    fn test_company_group_max_heat_treats_missing_as_zero() {
        let group = CompanyGroup {
            company: "X".to_string(),
            events: vec![event("X", None), event("X", Some(2.5))],
        };
        assert_eq!(group.count(), 2);
        assert_eq!(group.max_heat(), 2.5);

        let empty_heat = CompanyGroup {
            company: "Y".to_string(),
            events: vec![event("Y", None)],
        };
        assert_eq!(empty_heat.max_heat(), 0.0);
    }

    #[test]
    fn test_front_matter_deserialization() {
        let yaml = "title: \"台股事件雷達｜2026-02-09\"\ndate: \"2026-02-09\"\ntype: \"daily-radar\"\nrange_days: 3\nexclude_companies: ['時報', '三星']\n";
        let fm: FrontMatter = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(fm.date.as_deref(), Some("2026-02-09"));
        assert_eq!(fm.kind.as_deref(), Some("daily-radar"));
        assert_eq!(fm.range_days, Some(3));
        assert_eq!(fm.exclude_companies, vec!["時報", "三星"]);
    }

    #[test]
    fn test_keyword_hit_serialization_skips_missing_dates() {
        let hit = KeywordHit::empty("CoWoS");
        let json = serde_json::to_string(&hit).unwrap();
        assert_eq!(json, r#"{"keyword":"CoWoS","hitDays":0}"#);
    }
}
