//! # Radar Notes
//!
//! Static-site tooling for a Taiwan-equities event radar: daily reports,
//! hand-written research notes and a keyword taxonomy with hit statistics.
//!
//! ## Features
//!
//! - Post-processes the HTML that the markdown converter renders for each
//!   daily report: event ranking cards, a heat-ranking bar list, foldable
//!   source lists and a trimmed summary
//! - Lists and renders daily reports from a content directory
//! - Ranks research notes by weight and date
//! - Counts keyword hits across the daily reports and exports the catalog
//!
//! ## Usage
//!
//! ```sh
//! radar_notes transform -i content/daily/2026-02-09.html -o out.html
//! radar_notes daily list
//! radar_notes build -o ./out
//! ```
//!
//! ## Architecture
//!
//! 1. **Report**: parse the rendered fragment once into a node tree, run the
//!    rewrite stages over it, serialize once
//! 2. **Content**: daily report store, notes, keyword catalog and hit scan
//! 3. **Output**: page shells and the keyword JSON document

use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod content;
mod models;
mod outputs;
mod report;
mod utils;

use cli::{Cli, Command, DailyCommand, ExportFormat, KeywordsCommand, NotesCommand};
use content::keywords::{self, KEYWORD_CATS, KEYWORDS_CHANGELOG, KEYWORDS_VERSION};
use content::{daily, notes};
use outputs::json::{KeywordsDocument, write_keywords_document};
use outputs::pages;
use utils::{ensure_writable_dir, truncate_for_log};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // stdout carries command output, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(content_dir = %args.content_dir, command = ?args.command, "Parsed CLI arguments");
    let daily_dir = PathBuf::from(&args.content_dir).join("daily");

    let result = match args.command {
        Command::Transform { input, output } => transform(&input, output.as_deref()).await,
        Command::Daily { command } => run_daily(&daily_dir, command).await,
        Command::Notes { command } => run_notes(command).await,
        Command::Keywords { command } => run_keywords(&daily_dir, command).await,
        Command::Build { output_dir } => build_site(&daily_dir, &output_dir).await,
    };
    if let Err(ref e) = result {
        error!(error = %e, "Command failed");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    result
}

/// Write to `output` when given, otherwise to stdout.
async fn emit(output: Option<&str>, contents: &str) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            tokio::fs::write(path, contents).await?;
            info!(%path, bytes = contents.len(), "Wrote output");
        }
        None => println!("{contents}"),
    }
    Ok(())
}

async fn transform(input: &str, output: Option<&str>) -> Result<(), Box<dyn Error>> {
    let html = if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(input).await?
    };
    debug!(preview = %truncate_for_log(&html, 120), "Read rendered report");
    let transformed = report::transform_daily_html(&html);
    emit(output, &transformed).await
}

async fn run_daily(dir: &Path, command: DailyCommand) -> Result<(), Box<dyn Error>> {
    match command {
        DailyCommand::List => {
            for meta in daily::daily_list(dir).await? {
                println!("{}\t{}\t{}", meta.date, meta.slug, meta.title);
            }
        }
        DailyCommand::Latest => match daily::latest_daily(dir).await? {
            Some(meta) => println!("{}\t{}\t{}", meta.date, meta.slug, meta.title),
            None => warn!(dir = %dir.display(), "No daily reports found"),
        },
        DailyCommand::Render { slug, output } => {
            let page = daily::daily_page(dir, &slug).await?;
            emit(output.as_deref(), &pages::daily_page(&page)).await?;
        }
    }
    Ok(())
}

async fn run_notes(command: NotesCommand) -> Result<(), Box<dyn Error>> {
    match command {
        NotesCommand::List { high_only } => {
            let listed = if high_only {
                notes::high_priority_notes()
            } else {
                notes::all_notes()
            };
            for note in listed {
                let weight = note.weight.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string());
                println!("{}\t{}\t{}\t{}", note.date, weight, note.slug, note.title);
            }
        }
        NotesCommand::Show { slug, output } => {
            let note = notes::note_by_slug(&slug);
            if note.is_none() {
                warn!(%slug, "Note not found");
            }
            emit(output.as_deref(), &pages::note_page(&slug, note.as_ref())).await?;
        }
    }
    Ok(())
}

async fn run_keywords(dir: &Path, command: KeywordsCommand) -> Result<(), Box<dyn Error>> {
    match command {
        KeywordsCommand::Hits { json_output_dir } => {
            let hits = keywords::build_keyword_hits(dir, &KEYWORD_CATS).await?;
            let stats = keywords::catalog_stats(&KEYWORD_CATS, &hits);
            info!(
                categories = stats.categories,
                keywords = stats.keywords,
                hit_days = stats.hit_days,
                "Keyword hit scan complete"
            );
            match json_output_dir {
                Some(json_output_dir) => {
                    let doc = KeywordsDocument {
                        version: KEYWORDS_VERSION,
                        cats: &KEYWORD_CATS,
                        hits: &hits,
                        changelog: &KEYWORDS_CHANGELOG,
                    };
                    write_keywords_document(&doc, &json_output_dir).await?;
                }
                None => println!("{}", serde_json::to_string_pretty(&hits)?),
            }
        }
        KeywordsCommand::Export { format, query } => {
            let cats = keywords::filter_catalog(&KEYWORD_CATS, query.as_deref().unwrap_or(""));
            let exported = match format {
                ExportFormat::Text => keywords::export_text(&cats),
                ExportFormat::Json => keywords::export_json(&cats)?,
            };
            println!("{exported}");
        }
    }
    Ok(())
}

/// Write every page plus the keyword document under `output_dir`.
///
/// A report whose rendered body is missing is skipped with a warning.
#[instrument(level = "info", skip(daily_dir))]
async fn build_site(daily_dir: &Path, output_dir: &str) -> Result<(), Box<dyn Error>> {
    let root = output_dir.trim_end_matches('/');
    if let Err(e) = ensure_writable_dir(root).await {
        error!(
            path = %root,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Daily ----
    let items = daily::daily_list(daily_dir).await?;
    let daily_out = format!("{root}/daily");
    ensure_writable_dir(&daily_out).await?;
    tokio::fs::write(format!("{root}/daily.html"), pages::daily_index_page(&items)).await?;
    let mut rendered = 0usize;
    for meta in &items {
        match daily::daily_page(daily_dir, &meta.slug).await {
            Ok(page) => {
                tokio::fs::write(format!("{daily_out}/{}.html", meta.slug), pages::daily_page(&page)).await?;
                rendered += 1;
            }
            Err(e) => warn!(slug = %meta.slug, error = %e, "Skipping report without rendered body"),
        }
    }
    info!(listed = items.len(), rendered, "Wrote daily pages");

    // ---- Notes ----
    let notes_out = format!("{root}/notes");
    ensure_writable_dir(&notes_out).await?;
    let ranked = notes::ranked_notes();
    tokio::fs::write(
        format!("{root}/notes.html"),
        pages::notes_page(&notes::high_priority_notes(), &ranked),
    )
    .await?;
    for note in &ranked {
        tokio::fs::write(
            format!("{notes_out}/{}.html", note.slug),
            pages::note_page(&note.slug, Some(note)),
        )
        .await?;
    }
    info!(count = ranked.len(), "Wrote note pages");

    // ---- Keywords ----
    let hits = keywords::build_keyword_hits(daily_dir, &KEYWORD_CATS).await?;
    let doc = KeywordsDocument {
        version: KEYWORDS_VERSION,
        cats: &KEYWORD_CATS,
        hits: &hits,
        changelog: &KEYWORDS_CHANGELOG,
    };
    write_keywords_document(&doc, root).await?;

    Ok(())
}
