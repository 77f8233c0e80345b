//! Client-side book search.
//!
//! The [`SearchClient`] loads the generated search index once through an
//! injected [`IndexSource`] and answers queries against it:
//!
//! ```text
//! Uninitialized ──init──▶ Loading ──ok──▶ Ready
//!                                  └─err─▶ Degraded   (logged, never retried)
//! ```
//!
//! Matching is fuzzy by default: each field is scored by the best
//! approximate occurrence of the query in it (edit distance relative to the
//! query length, plus a small penalty for occurring late in the text) and a
//! book is a hit when its best field scores within the threshold. Lower
//! scores rank first. [`MatchMode::Substring`] is the plain
//! case-insensitive fallback where every hit scores [`FALLBACK_SCORE`].

use std::fs;
use std::path::PathBuf;

use maud::{Markup, html};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::SearchConfig;
use crate::types::SearchIndexEntry;

/// Score given to every substring-fallback hit.
pub const FALLBACK_SCORE: f64 = 0.5;

/// Shown when a query has no hits.
pub const NO_RESULTS: &str = "Không tìm thấy kết quả";

/// Path of the page that shows full results for a submitted query.
pub const SEARCH_PAGE: &str = "/search.html";

/// Characters of distance from the start of a field that cost a full
/// point of score.
const LOCATION_DISTANCE: f64 = 100.0;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid search index: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Search index request failed with status {0}")]
    Status(u16),
}

/// Where the search index comes from.
pub trait IndexSource {
    fn fetch(&self) -> Result<Vec<SearchIndexEntry>, SearchError>;
}

/// Reads the index file of a locally built site.
#[derive(Debug, Clone)]
pub struct FileIndexSource {
    pub path: PathBuf,
}

impl IndexSource for FileIndexSource {
    fn fetch(&self) -> Result<Vec<SearchIndexEntry>, SearchError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Fetches the index from a deployed site.
#[derive(Debug)]
pub struct HttpIndexSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpIndexSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SearchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("ssgepub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl IndexSource for HttpIndexSource {
    fn fetch(&self) -> Result<Vec<SearchIndexEntry>, SearchError> {
        let response = self.client.get(&self.url).send()?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }
        Ok(response.json()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Uninitialized,
    Loading,
    Ready,
    /// The index could not be loaded; every search comes back empty.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Fuzzy,
    Substring,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub max_results: usize,
    pub min_query_len: usize,
    /// Highest fuzzy score still counted as a hit, in `[0, 1]`.
    pub threshold: f64,
    pub mode: MatchMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results,
            min_query_len: config.min_query_len,
            threshold: config.threshold,
            mode: MatchMode::Fuzzy,
        }
    }
}

/// One ranked hit. Lower scores are better; `0.0` is an exact match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub entry: SearchIndexEntry,
    pub score: f64,
}

pub struct SearchClient<S> {
    source: S,
    options: SearchOptions,
    state: SearchState,
    index: Vec<SearchIndexEntry>,
}

impl<S: IndexSource> SearchClient<S> {
    pub fn new(source: S, options: SearchOptions) -> Self {
        Self {
            source,
            options,
            state: SearchState::Uninitialized,
            index: Vec::new(),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Load the index. Only the first call fetches; a failed load leaves
    /// the client degraded for good.
    pub fn init(&mut self) -> SearchState {
        if self.state != SearchState::Uninitialized {
            return self.state;
        }
        self.state = SearchState::Loading;
        match self.source.fetch() {
            Ok(index) => {
                debug!(entries = index.len(), "search index loaded");
                self.index = index;
                self.state = SearchState::Ready;
            }
            Err(e) => {
                error!("search initialization failed: {e}");
                self.state = SearchState::Degraded;
            }
        }
        self.state
    }

    /// Ranked hits for `query`, at most `max_results` of them.
    ///
    /// A blank query, or a client without a loaded index, yields nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() || self.state != SearchState::Ready {
            return Vec::new();
        }
        let mut hits = match self.options.mode {
            MatchMode::Fuzzy => fuzzy_search(&self.index, query, self.options.threshold),
            MatchMode::Substring => substring_search(&self.index, query),
        };
        hits.truncate(self.options.max_results);
        hits
    }

    /// Search-as-you-type: `None` means the results dropdown stays hidden
    /// because the input is shorter than `min_query_len` characters.
    pub fn live_search(&self, input: &str) -> Option<Vec<SearchHit>> {
        let query = input.trim();
        if query.chars().count() < self.options.min_query_len {
            return None;
        }
        Some(self.search(query))
    }
}

/// Fuzzy hits sorted by ascending score; equal scores keep index order.
pub fn fuzzy_search(index: &[SearchIndexEntry], query: &str, threshold: f64) -> Vec<SearchHit> {
    let pattern: Vec<char> = query.to_lowercase().chars().collect();
    let mut hits: Vec<SearchHit> = index
        .iter()
        .filter_map(|entry| {
            searchable_fields(entry)
                .filter_map(|field| field_score(&pattern, field))
                .filter(|score| *score <= threshold)
                .min_by(f64::total_cmp)
                .map(|score| SearchHit {
                    entry: entry.clone(),
                    score,
                })
        })
        .collect();
    hits.sort_by(|a, b| a.score.total_cmp(&b.score));
    hits
}

/// Case-insensitive substring hits in index order, all scored
/// [`FALLBACK_SCORE`].
pub fn substring_search(index: &[SearchIndexEntry], query: &str) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    index
        .iter()
        .filter(|entry| searchable_fields(entry).any(|f| f.to_lowercase().contains(&needle)))
        .map(|entry| SearchHit {
            entry: entry.clone(),
            score: FALLBACK_SCORE,
        })
        .collect()
}

fn searchable_fields(entry: &SearchIndexEntry) -> impl Iterator<Item = &str> {
    [
        entry.title.as_str(),
        entry.author.as_str(),
        entry.description.as_str(),
    ]
    .into_iter()
    .chain(entry.tags.iter().map(String::as_str))
}

/// Best score of `pattern` (already lowercased) anywhere in `text`.
///
/// Semi-global edit distance: the pattern must be consumed whole but may
/// start and end anywhere in the text. Among equally good alignments the
/// earliest start wins.
fn field_score(pattern: &[char], text: &str) -> Option<f64> {
    if pattern.is_empty() || text.is_empty() {
        return None;
    }
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let m = pattern.len();

    // (edits, start) of the best alignment of pattern[..i] ending at text[..j].
    let mut prev: Vec<(usize, usize)> = (0..=text.len()).map(|j| (0, j)).collect();
    for (i, &p) in pattern.iter().enumerate() {
        let mut row = Vec::with_capacity(text.len() + 1);
        row.push((i + 1, 0));
        for (j, &t) in text.iter().enumerate() {
            let substitute = (prev[j].0 + usize::from(p != t), prev[j].1);
            let skip_text = (row[j].0 + 1, row[j].1);
            let skip_pattern = (prev[j + 1].0 + 1, prev[j + 1].1);
            row.push(substitute.min(skip_text).min(skip_pattern));
        }
        prev = row;
    }

    prev.iter()
        .map(|&(edits, start)| edits as f64 / m as f64 + start as f64 / LOCATION_DISTANCE)
        .min_by(f64::total_cmp)
}

/// Results dropdown markup. All text is escaped by maud.
pub fn render_results(hits: &[SearchHit]) -> Markup {
    html! {
        @if hits.is_empty() {
            div.search-empty { (NO_RESULTS) }
        } @else {
            @for hit in hits {
                a.search-result href=(hit.entry.url) {
                    div.search-result-title { (hit.entry.title) }
                    div.search-result-author { (hit.entry.author) }
                }
            }
        }
    }
}

/// Where submitting `query` navigates; `None` for a blank query.
pub fn submit_url(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| format!("{SEARCH_PAGE}?q={}", encode_uri_component(query)))
}

/// Percent-encode everything except the characters JavaScript's
/// `encodeURIComponent` leaves alone.
fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
