//! Shared types used across all pipeline stages.
//!
//! A [`Book`] is built once per discovered `books/*.md` file after its
//! frontmatter passes validation, and is never mutated afterwards. Later
//! stages (sorting, index projection, rendering) only borrow it.

use serde::{Deserialize, Serialize};

/// One downloadable mirror of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub url: String,
    pub platform: String,
}

/// A book in the catalog, built from one markdown file's frontmatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Cover image URL.
    pub cover: String,
    /// Equivalent mirrors, in author-declared order. Never empty once validated.
    pub download_links: Vec<DownloadLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    /// URL slug derived from the source filename, not from frontmatter.
    #[serde(default)]
    pub slug: String,
    /// Raw markdown body following the frontmatter block.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl Book {
    /// The description, treating an empty string the same as an absent one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Collection URL used by cards and the search index.
    pub fn url(&self) -> String {
        format!("/books/{}/", self.slug)
    }
}

/// Flat search record consumed by the client-side search.
///
/// One entry per book, in the order the books were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndexEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: String,
}

/// A standalone markdown page (about, contact, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from first `# heading` in markdown, or the slug as fallback
    pub title: String,
    pub slug: String,
    pub body: String,
}
