//! # ssgepub
//!
//! A minimal static site generator for ebook catalogs. Every book is a
//! markdown file with YAML frontmatter; the generated site is a paginated
//! catalog with one detail page per book, client-side search, a light/dark
//! theme and a download button that picks a mirror per reader.
//!
//! # Architecture: Scan → Collect → Generate
//!
//! ```text
//! 1. Scan      content/books/*.md  →  Manifest      (validated records)
//! 2. Collect   Manifest            →  sorted pages  (collation, index, pagination)
//! 3. Generate  Manifest            →  dist/         (final HTML site)
//! ```
//!
//! Scanning is the validation gate: the first record that fails validation
//! aborts the build with every finding for that file. Nothing downstream
//! ever sees an invalid book. The manifest is plain serializable data, so
//! `ssgepub scan` can dump it as JSON for inspection.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — discovers book and page files, validates, builds the [`scan::Manifest`] |
//! | [`frontmatter`] | YAML frontmatter extraction and the record validator |
//! | [`collection`] | Sorting by Vietnamese collation, search-index projection, pagination |
//! | [`collation`] | The Vietnamese-locale string comparator used for sorting |
//! | [`render`] | Card, detail and structured-data renderers |
//! | [`seo`] | Title, description, Open Graph and Twitter meta tags |
//! | [`generate`] | Stage 3 — writes the static site using Maud |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation, CSS generation |
//! | [`types`] | `Book`, `DownloadLink`, `SearchIndexEntry`, `Page` |
//! | [`naming`] | Slugs and URL/output-path conventions |
//! | [`client`] | Browser-side behavior: search, theme, download mirror selection |
//! | [`output`] | CLI output formatting for each command |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed markup is a build error and every
//! interpolation is escaped, so the completeness checks of the renderers
//! are made against exactly what a browser would display.
//!
//! ## Client Logic With Injected Collaborators
//!
//! The search, theme and download behaviors are written once in Rust
//! against small traits ([`client::Storage`], an index source, a preference
//! service, a link opener) and tested against in-memory fakes. The shipped
//! `site.js` follows the same rules in the browser; the CLI's `search` and
//! `resolve-download` commands drive the Rust versions against real files
//! and HTTP endpoints.

pub mod client;
pub mod collation;
pub mod collection;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod seo;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
