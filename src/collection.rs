//! Collection assembly: sorting, search-index projection and pagination.
//!
//! All functions here are pure. They borrow the validated books and hand
//! back new sequences; the caller's slice is never reordered.

use crate::collation::CollationKey;
use crate::types::{Book, SearchIndexEntry};

/// Order books alphabetically by title under Vietnamese collation.
///
/// The sort is stable: books whose titles collate equal keep their input
/// order. The input slice is left untouched.
pub fn sort_alphabetically(books: &[Book]) -> Vec<&Book> {
    let mut sorted: Vec<&Book> = books.iter().collect();
    sorted.sort_by_cached_key(|book| CollationKey::new(&book.title));
    sorted
}

/// Project books onto flat search-index entries, one per book, same order.
pub fn project_search_index<'a>(
    books: impl IntoIterator<Item = &'a Book>,
) -> Vec<SearchIndexEntry> {
    books
        .into_iter()
        .map(|book| SearchIndexEntry {
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone().unwrap_or_default(),
            tags: book.tags.clone(),
            url: book.url(),
        })
        .collect()
}

/// Split items into contiguous pages of `page_size`.
///
/// - `page_size == 0` yields no pages at all.
/// - An empty input yields exactly one empty page, so listings always
///   have a first page to render.
/// - Otherwise every page holds `page_size` items except possibly the last.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    if page_size == 0 {
        return Vec::new();
    }
    if items.is_empty() {
        return vec![&items[..0]];
    }
    items.chunks(page_size).collect()
}

/// The first `n` items (or all of them when there are fewer).
pub fn limit<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}
