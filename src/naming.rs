//! URL slugs for books and pages.
//!
//! A book's slug comes from its storage identity, the markdown filename,
//! never from its title. Renaming the title keeps URLs stable; renaming the
//! file moves the page.
//!
//! - `books/de-men-phieu-luu-ky.md` → `de-men-phieu-luu-ky`
//! - `books/Truyện Kiều.md` → `truyen-kieu`
//! - `books/Đất Rừng.md` → `dat-rung`

use crate::collation::fold_to_ascii;
use std::path::Path;

/// Turn arbitrary text into a URL-safe slug.
///
/// Lowercases, folds Vietnamese letters to their ASCII base, collapses every
/// run of characters outside `[a-z0-9]` into a single dash and trims dashes
/// from both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        let c = fold_to_ascii(c).unwrap_or_else(|| c.to_ascii_lowercase());
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if !is_combining_mark(c) {
            pending_dash = true;
        }
    }
    slug
}

// Combining accents fold away with their letter instead of splitting words.
fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Slug for a content file: the slugified file stem.
///
/// Falls back to the raw stem when nothing slug-worthy remains (e.g. a
/// filename written entirely in a non-Latin script).
pub fn file_slug(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let slug = slugify(&stem);
    if slug.is_empty() { stem } else { slug }
}

/// Generated file path of a book's detail page.
///
/// Collection links use the directory form (`/books/{slug}/`, see
/// [`Book::url`]); this is the file the generator writes.
///
/// [`Book::url`]: crate::types::Book::url
pub fn detail_page_url(slug: &str) -> String {
    format!("/books/{slug}/index.html")
}

/// Link to page `n` (1-based) of the paginated home listing.
///
/// Page 1 is the site root; later pages live under `/page/{n}/`.
pub fn home_page_url(n: usize) -> String {
    if n <= 1 {
        "/".to_string()
    } else {
        format!("/page/{n}/")
    }
}

/// Output file for a site URL: directory URLs map to their `index.html`.
pub fn output_path(url: &str) -> String {
    let path = url.trim_start_matches('/');
    if path.is_empty() || path.ends_with('/') {
        format!("{path}index.html")
    } else {
        path.to_string()
    }
}
