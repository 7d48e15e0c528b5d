//! Read-only content stores backing the site.
//!
//! - [`daily`]: daily radar reports on disk (front matter + rendered body)
//! - [`notes`]: compiled-in research notes
//! - [`keywords`]: keyword taxonomy and hit statistics over the reports

pub mod daily;
pub mod keywords;
pub mod notes;
