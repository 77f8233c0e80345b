//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (book, page) is its semantic identity (positional index
//! and title) with filesystem paths shown as secondary context via indented
//! `Source:` lines. The output reads as a catalog inventory while still
//! letting users trace data back to specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Books
//! 001 Dế Mèn phiêu lưu ký (2 mirrors)
//!     Author: Tô Hoài
//!     Source: books/de-men.md
//!     Tags: thiếu nhi, kinh điển
//!
//! Pages
//! 001 Giới thiệu
//!     Source: pages/gioi-thieu.md
//!
//! Config
//!     config.toml
//!     images/
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home
//! 001 → index.html
//! 002 → page/2/index.html
//!
//! Books
//! 001 Dế Mèn phiêu lưu ký → books/de-men/index.html
//!
//! Search → search.html, search-index.json (1 entries)
//!
//! Generated 1 books, 2 home pages, 0 pages, 0 assets
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::client::search::{NO_RESULTS, SearchHit};
use crate::generate::GenerateReport;
use crate::scan::Manifest;
use crate::types::{Book, DownloadLink};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn mirror_count(book: &Book) -> String {
    match book.download_links.len() {
        1 => "1 mirror".to_string(),
        n => format!("{n} mirrors"),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered catalog.
///
/// Books appear in file order, each with its author, source file and, when
/// present, a truncated description and its tags.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let catalog = &manifest.config.catalog;
    let mut lines = vec!["Books".to_string()];

    for (i, book) in manifest.books.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            book.title,
            mirror_count(book)
        ));
        lines.push(format!("    Author: {}", book.author));
        lines.push(format!("    Source: {}/{}.md", catalog.books_dir, book.slug));
        if let Some(desc) = book.description() {
            lines.push(format!("    {}", truncate_desc(desc.trim(), 60)));
        }
        if !book.tags.is_empty() {
            lines.push(format!("    Tags: {}", book.tags.join(", ")));
        }
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), page.title));
            lines.push(format!("    Source: {}/{}.md", catalog.pages_dir, page.slug));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    }
    if source_root.join(&catalog.assets_dir).is_dir() {
        lines.push(format!("    {}/", catalog.assets_dir));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    print_lines(format_scan_output(manifest, source_root));
}

/// Summary line of a successful `check`.
pub fn format_check_output(manifest: &Manifest) -> Vec<String> {
    vec![format!(
        "{} books valid, {} pages",
        manifest.books.len(),
        manifest.pages.len()
    )]
}

pub fn print_check_output(manifest: &Manifest) {
    print_lines(format_check_output(manifest));
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format generate stage output showing generated files.
///
/// Information-first: each entity leads with its positional index and title,
/// followed by `→` and the output path.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec!["Home".to_string()];
    for (i, path) in report.home_pages.iter().enumerate() {
        lines.push(format!("{} \u{2192} {}", format_index(i + 1), path));
    }

    if !report.books.is_empty() {
        lines.push(String::new());
        lines.push("Books".to_string());
        for (i, book) in report.books.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                book.title,
                book.path
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Search \u{2192} search.html, {} ({} entries)",
        report.search_index, report.search_entries
    ));

    if !report.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in report.pages.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                page.title,
                page.path
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} books, {} home pages, {} pages, {} assets",
        report.books.len(),
        report.home_pages.len(),
        report.pages.len(),
        report.assets_copied
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    print_lines(format_generate_output(report));
}

// ============================================================================
// Client commands
// ============================================================================

/// Ranked search hits, best first, with their score and link.
pub fn format_search_output(hits: &[SearchHit]) -> Vec<String> {
    if hits.is_empty() {
        return vec![NO_RESULTS.to_string()];
    }
    let mut lines = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2014} {} (score {:.2})",
            format_index(i + 1),
            hit.entry.title,
            hit.entry.author,
            hit.score
        ));
        lines.push(format!("    {}", hit.entry.url));
    }
    lines
}

pub fn print_search_output(hits: &[SearchHit]) {
    print_lines(format_search_output(hits));
}

/// The mirror chosen for a book.
pub fn format_download_output(book: &Book, link: Option<&DownloadLink>) -> Vec<String> {
    match link {
        Some(link) => vec![
            format!("{} \u{2192} {}", book.title, link.platform),
            format!("    {}", link.url),
        ],
        None => vec![format!("{}: no download link available", book.title)],
    }
}

pub fn print_download_output(book: &Book, link: Option<&DownloadLink>) {
    print_lines(format_download_output(book, link));
}

// ============================================================================
// Tests
// ============================================================================
