//! JSON output of the keyword hit statistics.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── keywords/
//!     └── hits.json
//! ```
//!
//! The file holds the catalog version, the catalog itself and the hit index,
//! so a static page can render the keyword browser without rescanning the
//! reports.

use crate::content::keywords::HitsIndex;
use crate::models::{ChangelogItem, KeywordCat};
use crate::utils::ensure_writable_dir;
use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct KeywordsDocument<'a> {
    pub version: &'a str,
    pub cats: &'a [KeywordCat],
    pub hits: &'a HitsIndex,
    pub changelog: &'a [ChangelogItem],
}

/// Write the keyword document to `{json_output_dir}/keywords/hits.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_keywords_document(
    doc: &KeywordsDocument<'_>,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(doc)?;

    let full_json_dir = format!("{}/keywords", json_output_dir.trim_end_matches('/'));
    info!(%full_json_dir, "Ensuring JSON directory exists");
    ensure_writable_dir(&full_json_dir).await?;

    let output_json_filename = format!("{}/hits.json", full_json_dir);
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote keyword hits JSON");

    Ok(output_json_filename)
}
