//! Command-line interface definitions for Radar Notes.
//!
//! This module defines the CLI arguments and subcommands using the `clap` crate.
//! The content location can be provided via flag or environment variable.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the Radar Notes site tool.
///
/// # Examples
///
/// ```sh
/// # Transform a report body rendered by the markdown converter
/// radar_notes transform -i content/daily/2026-02-09.html
///
/// # List daily reports from a custom content tree
/// RADAR_CONTENT_DIR=/srv/radar/content radar_notes daily list
///
/// # Write every page plus the keyword document
/// radar_notes build -o ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Content root; daily reports live under `{content_dir}/daily`
    /// as `{slug}.md` plus the rendered `{slug}.html`
    #[arg(long, env = "RADAR_CONTENT_DIR", default_value = "content", global = true)]
    pub content_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Post-process one rendered daily report body
    Transform {
        /// Rendered HTML file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Daily radar reports
    Daily {
        #[command(subcommand)]
        command: DailyCommand,
    },
    /// Research notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },
    /// Keyword taxonomy
    Keywords {
        #[command(subcommand)]
        command: KeywordsCommand,
    },
    /// Write every page and the keyword document
    Build {
        /// Output directory for the generated site
        #[arg(short, long, default_value = "out")]
        output_dir: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DailyCommand {
    /// List reports, newest first
    List,
    /// Show the newest report
    Latest,
    /// Render one report page
    Render {
        slug: String,
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// List notes, newest first
    List {
        /// Only notes at or above the high-priority weight
        #[arg(long)]
        high_only: bool,
    },
    /// Render one note page
    Show {
        slug: String,
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeywordsCommand {
    /// Count keyword hits across the daily reports
    Hits {
        /// Write the keyword document here instead of printing the hits
        #[arg(short, long)]
        json_output_dir: Option<String>,
    },
    /// Export the catalog
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
        /// Only categories/keywords matching this query
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}
