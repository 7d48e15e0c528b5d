//! Utility functions for text handling and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - HTML escaping and whitespace normalization for rendered text
//! - Numeric heat parsing shared by the report parsers
//! - String truncation for logging
//! - File system validation for output directories

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Escape the characters that are significant in HTML text content.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
/// ```
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// [`escape_html`] plus double quotes, for `"`-quoted attribute values.
pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}

/// Collapse every run of whitespace into a single space and trim the ends.
///
/// Used for table cell texts so that cells read from an HTML table and from
/// a pipe-delimited block compare equal.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a heat value out of free-form cell text.
///
/// Every character that is not an ASCII digit or a dot is discarded before
/// parsing, so `"12.5 分"` reads as `12.5`. Returns `None` when nothing
/// numeric remains or the result is not finite.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_heat_value("12.5"), Some(12.5));
/// assert_eq!(parse_heat_value("n/a"), None);
/// ```
pub fn parse_heat_value(s: &str) -> Option<f64> {
    let digits: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (backing off to the
/// nearest character boundary) with an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  台積電 \n  2330 "), "台積電 2330");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_parse_heat_value() {
        assert_eq!(parse_heat_value("12.5"), Some(12.5));
        assert_eq!(parse_heat_value(" 8 分"), Some(8.0));
        assert_eq!(parse_heat_value("n/a"), None);
        assert_eq!(parse_heat_value(""), None);
        assert_eq!(parse_heat_value("1.2.3"), None);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        let s = "熱度".repeat(10);
        let result = truncate_for_log(&s, 4);
        assert!(result.starts_with("熱"));
        assert!(result.contains("bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = std::env::temp_dir().join(format!("radar_notes_probe_{}", std::process::id()));
        let path = dir.to_string_lossy().to_string();
        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
