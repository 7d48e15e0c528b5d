//! Report vocabulary and the patterns compiled from it.
//!
//! The daily report exporter writes Traditional Chinese labels followed by a
//! full-width colon; a half-width colon is accepted everywhere as well.

use once_cell::sync::Lazy;
use regex::Regex;

pub const SOURCES_LABEL: &str = "代表新聞";
pub const SUMMARY_HEADING: &str = "今日摘要";
pub const RANKING_HEADING: &str = "事件排行";
pub const HEAT_HEADING: &str = "公司熱度";
pub const RUN_LOG_HEADING: &str = "抓取狀態";
pub const TOP_EVENT_LABEL: &str = "最高熱度事件";

/// Occurrences of this string are what the summary backfill counts.
pub const HIGH_CONFIDENCE_MARK: &str = "信心：高";
pub const CONFIDENCE_SOURCE: &str = "高信心";
pub const CONFIDENCE_TARGET: &str = "信心";
pub const CONFIDENCE_UNKNOWN: &str = "—";

pub const HIGH_CONFIDENCE_SUMMARY_LABEL: &str = "信心等級為高的事件";
pub const COUNT_PLACEHOLDER: &str = "__HIGH_CONFIDENCE_COUNT__";

pub const UNKNOWN_COMPANY: &str = "（未辨識公司）";
pub const DEFAULT_RANKING_HEADING: &str = "事件排行（依公司彙整）";
pub const DEFAULT_HEAT_HEADING: &str = "公司熱度（Top 20）";

/// Header texts that identify the company column. The ASCII entry is
/// compared case-insensitively.
pub const COMPANY_HEADERS: &[&str] = &["公司", "名稱", "標的", "股票", "company"];
pub const HEAT_HEADERS: &[&str] = &["熱度", "heat"];

/// The value must sit on the label's own line; an empty `公司：` captures
/// nothing.
pub static COMPANY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^\S\n]*公司[^\S\n]*[：:][^\S\n]*([^\n｜|]+)").unwrap());

pub static TOPIC_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*主題\s*[：:]").unwrap());

pub static COMPANY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*公司\s*[：:]").unwrap());

/// Unanchored: the first `熱度：N` anywhere in the scanned text wins.
pub static HEAT_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"熱度\s*[：:]\s*([0-9]+(?:\.[0-9]+)?)").unwrap());

/// Company value inside a single list item, stopping at field separators.
pub static ITEM_COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"公司\s*[：:]\s*([^｜|,，;；\n]+)").unwrap());

pub static ITEM_HEAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"熱度\s*[：:]\s*([^｜|,，;；\n]+)").unwrap());

pub static NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\s*[)）]\s*").unwrap());

pub static SOURCES_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*代表新聞\s*[：:]?\s*$").unwrap());

pub static CONFIDENCE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"高信心\s*[：:]\s*(-?\d+)?").unwrap());

pub static SUMMARY_KEEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(事件數|最高熱度事件)\s*[：:]").unwrap());

pub static TOP_EVENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*最高熱度事件\s*[：:]\s*").unwrap());

/// Leading list bullet left behind when markdown lists were not converted.
pub static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•・]\s+").unwrap());

pub fn is_company_header(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPANY_HEADERS.iter().any(|h| lower.contains(h))
}

pub fn is_heat_header(text: &str) -> bool {
    let lower = text.to_lowercase();
    HEAT_HEADERS.iter().any(|h| lower.contains(h))
}

/// Remove a leading `N)` / `N）` numbering prefix.
pub fn strip_numbering(title: &str) -> String {
    NUMBERING.replace(title, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_numbering() {
        assert_eq!(strip_numbering("1) 擴產"), "擴產");
        assert_eq!(strip_numbering("12）法說會"), "法說會");
        assert_eq!(strip_numbering("沒有編號"), "沒有編號");
    }

    #[test]
    fn test_header_matching() {
        assert!(is_company_header("公司"));
        assert!(is_company_header("Company"));
        assert!(is_company_header("股票名稱"));
        assert!(!is_company_header("主要主題"));
        assert!(is_heat_header("熱度"));
        assert!(is_heat_header("HEAT"));
        assert!(!is_heat_header("出現篇數"));
    }

    #[test]
    fn test_sources_line() {
        assert!(SOURCES_LINE.is_match("代表新聞"));
        assert!(SOURCES_LINE.is_match("代表新聞："));
        assert!(SOURCES_LINE.is_match("代表新聞:"));
        assert!(!SOURCES_LINE.is_match("代表新聞：無（未在 News 中匹配到同公司+同事件）"));
    }

    #[test]
    fn test_heat_field_reads_first_number() {
        let caps = HEAT_FIELD.captures("熱度：12.5（Δ1.2）｜篇數：3").unwrap();
        assert_eq!(&caps[1], "12.5");
        assert!(HEAT_FIELD.captures("最高熱度事件：擴產").is_none());
    }

    #[test]
    fn test_company_field_is_line_anchored() {
        let text = "1) 擴產\n公司：台積電\n主題：先進封裝";
        let caps = COMPANY_FIELD.captures(text).unwrap();
        assert_eq!(caps[1].trim(), "台積電");
        assert!(COMPANY_FIELD.captures("1) 主要公司：台積電").is_none());
    }

    #[test]
    fn test_company_field_empty_value_stays_on_its_line() {
        assert!(COMPANY_FIELD.captures("極性：正\n公司：\n熱度：5（Δ1）").is_none());
    }
}
