//! Shared test utilities for the ssgepub test suite.
//!
//! Provides book builders and a content-tree writer so tests can set up a
//! realistic `content/` directory in a temp dir without fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_content(&[("truyen-kieu", &book_md("Truyện Kiều", "Nguyễn Du"))]);
//! let manifest = scan(tmp.path()).unwrap();
//! let kieu = find_book(&manifest, "truyen-kieu");
//! assert_eq!(kieu.author, "Nguyễn Du");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::naming::slugify;
use crate::scan::Manifest;
use crate::types::{Book, DownloadLink};

// =========================================================================
// Builders
// =========================================================================

/// A valid book with the given title; slug is the slugified title.
pub fn book(title: &str) -> Book {
    Book {
        title: title.to_string(),
        author: "Tác giả".to_string(),
        cover: "https://example.com/cover.jpg".to_string(),
        download_links: vec![DownloadLink {
            url: "https://example.com/book.epub".to_string(),
            platform: "Drive".to_string(),
        }],
        description: None,
        tags: vec![],
        publish_date: None,
        slug: slugify(title),
        body: String::new(),
    }
}

/// Markdown source of a valid book file.
pub fn book_md(title: &str, author: &str) -> String {
    format!(
        "---\ntitle: \"{title}\"\nauthor: \"{author}\"\ncover: https://example.com/{slug}.jpg\n\
         downloadLinks:\n  - url: https://example.com/{slug}.epub\n    platform: Drive\n---\n\
         Nội dung của {title}.\n",
        slug = slugify(title),
    )
}

// =========================================================================
// Content tree
// =========================================================================

/// Write `books/<stem>.md` files into a fresh temp content root.
pub fn setup_content(books: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (stem, content) in books {
        write_book(tmp.path(), stem, content);
    }
    tmp
}

/// Write one book file under `<root>/books/`.
pub fn write_book(root: &Path, stem: &str, content: &str) {
    let dir = root.join("books");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{stem}.md")), content).unwrap();
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// Find a book by slug. Panics if not found.
pub fn find_book<'a>(manifest: &'a Manifest, slug: &str) -> &'a Book {
    manifest
        .books
        .iter()
        .find(|b| b.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.books.iter().map(|b| b.slug.as_str()).collect();
            panic!("book '{slug}' not found. Available: {slugs:?}")
        })
}

/// All book titles in manifest order.
pub fn book_titles(manifest: &Manifest) -> Vec<&str> {
    manifest.books.iter().map(|b| b.title.as_str()).collect()
}
