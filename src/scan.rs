//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the ssgepub build pipeline. Discovers book files and site
//! pages under the content root, runs every book through the frontmatter
//! validator, and produces a [`Manifest`] the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── books/                       # One markdown file per book
//! │   ├── de-men-phieu-luu-ky.md
//! │   └── so-do.md
//! ├── pages/                       # Standalone pages (optional)
//! │   └── gioi-thieu.md            # → /gioi-thieu.html
//! └── images/                      # Copied verbatim to the output (optional)
//! ```
//!
//! ## Validation gate
//!
//! Book files are processed in sorted path order. The first file whose
//! frontmatter fails validation aborts the scan with
//! [`ScanError::InvalidBook`], which lists every problem of that file.
//! There is no per-book skip: a catalog with a broken entry does not build.

use crate::config::{self, SiteConfig};
use crate::frontmatter::{self, ValidationIssue};
use crate::naming::file_slug;
use crate::types::{Book, Page};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Build Error in \"{}\":{}", .path.display(), issue_lines(.errors))]
    InvalidBook {
        path: PathBuf,
        errors: Vec<ValidationIssue>,
    },
    #[error("Invalid frontmatter in \"{}\": {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error(
        "Build Error: \"{}\" and \"{}\" both map to /books/{slug}/",
        .first.display(),
        .second.display()
    )]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Build Error in \"{}\": page slug \"{slug}\" is reserved for a generated page", .path.display())]
    ReservedPageSlug { path: PathBuf, slug: String },
}

fn issue_lines(errors: &[ValidationIssue]) -> String {
    errors.iter().map(|e| format!("\n  - {e}")).collect()
}

/// Manifest output from the scan stage
#[derive(Debug, Serialize)]
pub struct Manifest {
    /// Validated books in file order. Sorting happens at generate time.
    pub books: Vec<Book>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;

    let books = scan_books(&root.join(&config.catalog.books_dir))?;
    let pages = parse_pages(
        &root.join(&config.catalog.pages_dir),
        &reserved_page_slugs(&config),
    )?;

    Ok(Manifest {
        books,
        pages,
        config,
    })
}

/// Parse and validate every book file in `dir`.
///
/// A missing directory is an empty catalog. Two files whose names slug
/// to the same value would share a detail page, so that aborts the scan.
pub fn scan_books(dir: &Path) -> Result<Vec<Book>, ScanError> {
    let mut books = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for path in markdown_files(dir)? {
        let content = fs::read_to_string(&path)?;
        let book = parse_book(&path, &content)?;
        if let Some(first) = seen.get(&book.slug) {
            return Err(ScanError::DuplicateSlug {
                slug: book.slug,
                first: first.clone(),
                second: path,
            });
        }
        seen.insert(book.slug.clone(), path);
        books.push(book);
    }
    Ok(books)
}

/// Build a [`Book`] from one file's content, enforcing the validation gate.
pub fn parse_book(path: &Path, content: &str) -> Result<Book, ScanError> {
    let frontmatter_error = |source| ScanError::Frontmatter {
        path: path.to_path_buf(),
        source,
    };

    let (data, body) = frontmatter::parse(content).map_err(frontmatter_error)?;

    let result = frontmatter::validate(&data);
    if !result.is_valid() {
        return Err(ScanError::InvalidBook {
            path: path.to_path_buf(),
            errors: result.errors,
        });
    }

    // Explicit nulls mean "not set" for optional keys.
    let data: Mapping = data
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match k.as_str() {
                Some("downloadLinks") => stringify_links(v),
                Some("tags") => stringify_items(v),
                Some(_) => stringify_scalar(v),
                None => v,
            };
            (k, v)
        })
        .collect();
    let mut book: Book =
        serde_yaml::from_value(Value::Mapping(data)).map_err(frontmatter_error)?;

    book.slug = file_slug(path);
    book.body = body.to_string();
    if book.description().is_none() {
        book.description = None;
    }
    Ok(book)
}

/// Unquoted numbers and booleans (`author: 1984`) read as their text.
fn stringify_scalar(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => other,
    }
}

fn stringify_items(value: Value) -> Value {
    match value {
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(stringify_scalar).collect())
        }
        other => stringify_scalar(other),
    }
}

fn stringify_links(value: Value) -> Value {
    match value {
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Mapping(link) => Value::Mapping(
                        link.into_iter()
                            .map(|(k, v)| (k, stringify_scalar(v)))
                            .collect(),
                    ),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Page slugs whose `/{slug}.html` would overwrite a generated file.
fn reserved_page_slugs(config: &SiteConfig) -> Vec<String> {
    let mut reserved = vec!["index".to_string(), "search".to_string()];
    if let Some(stem) = Path::new(&config.search.index_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
    {
        reserved.push(stem);
    }
    reserved
}

/// Parse all markdown files in `dir` into pages.
///
/// The title is the first `# heading` of the body, or the slug when the
/// page has none. Frontmatter, if present, is stripped from the body.
fn parse_pages(dir: &Path, reserved: &[String]) -> Result<Vec<Page>, ScanError> {
    let mut pages = Vec::new();
    for path in markdown_files(dir)? {
        let slug = file_slug(&path);
        if reserved.contains(&slug) {
            return Err(ScanError::ReservedPageSlug { path, slug });
        }
        let content = fs::read_to_string(&path)?;
        let body = frontmatter::split(&content)
            .map(|(_, body)| body)
            .unwrap_or(&content);

        let title = body
            .lines()
            .find(|line| line.starts_with("# "))
            .map(|line| line.trim_start_matches("# ").trim().to_string())
            .unwrap_or_else(|| slug.clone());

        pages.push(Page {
            title,
            slug,
            body: body.to_string(),
        });
    }
    Ok(pages)
}

/// Non-hidden `.md` files directly inside `dir`, in sorted path order.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let hidden = p
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'));
            !hidden
                && p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}
