//! Output generation for static pages and JSON documents.
//!
//! # Submodules
//!
//! - [`pages`]: HTML shells for the daily index, daily report, notes index and note pages
//! - [`json`]: Writes the keyword catalog and hit statistics for the keyword browser
//!
//! # Output Structure
//!
//! ```text
//! output/
//! ├── daily.html                 # Daily index
//! ├── daily/2026-02-09.html      # One transformed report
//! ├── notes.html                 # Notes index
//! ├── notes/bbu-hvdc.html        # One note
//! └── keywords/hits.json         # Keyword document
//! ```

pub mod json;
pub mod pages;
