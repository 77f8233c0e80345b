//! Download mirror selection.
//!
//! A book lists several equivalent download mirrors. Which one a reader is
//! sent to is decided by an external preference service that answers with
//! a `platformIndex`. The answer is cached for the session under
//! [`STORAGE_KEY`]; while it is cached the service is not asked again.
//!
//! Failures never block a download: a transport error, a non-success
//! status or a response without a numeric index all fall back to the first
//! mirror, and nothing is cached so the next click asks again.

use std::cell::Cell;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::storage::Storage;
use crate::types::DownloadLink;

/// Session storage key of the cached platform index.
pub const STORAGE_KEY: &str = "ssgepub_platform_index";

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("preference service returned status {0}")]
    Status(u16),
    #[error("response has no numeric platformIndex")]
    MissingIndex,
    #[error("no preference service configured")]
    NotConfigured,
}

/// The external service that picks a mirror.
pub trait PlatformIndexService {
    fn platform_index(&self) -> Result<i64, PreferenceError>;
}

impl<P: PlatformIndexService + ?Sized> PlatformIndexService for &P {
    fn platform_index(&self) -> Result<i64, PreferenceError> {
        (**self).platform_index()
    }
}

/// `GET api_url`, expecting `{"platformIndex": <number>}`.
#[derive(Debug)]
pub struct HttpPlatformIndexService {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl HttpPlatformIndexService {
    pub fn new(api_url: impl Into<String>) -> Result<Self, PreferenceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("ssgepub/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

impl PlatformIndexService for HttpPlatformIndexService {
    fn platform_index(&self) -> Result<i64, PreferenceError> {
        let response = self.client.get(&self.api_url).send()?;
        if !response.status().is_success() {
            return Err(PreferenceError::Status(response.status().as_u16()));
        }
        let body: serde_json::Value = response.json()?;
        parse_platform_index(&body)
    }
}

/// Stand-in for sites without a configured service: always fails, so
/// resolution settles on the first mirror.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoService;

impl PlatformIndexService for NoService {
    fn platform_index(&self) -> Result<i64, PreferenceError> {
        Err(PreferenceError::NotConfigured)
    }
}

/// Extract `platformIndex` from a service response.
///
/// Fractional numbers are truncated toward zero.
pub fn parse_platform_index(body: &serde_json::Value) -> Result<i64, PreferenceError> {
    let index = body
        .get("platformIndex")
        .ok_or(PreferenceError::MissingIndex)?;
    index
        .as_i64()
        .or_else(|| index.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .ok_or(PreferenceError::MissingIndex)
}

/// The download button: shows a busy state and navigates to a mirror.
pub trait LinkOpener {
    fn open(&self, url: &str);

    fn set_loading(&self, _loading: bool) {}
}

impl<O: LinkOpener + ?Sized> LinkOpener for &O {
    fn open(&self, url: &str) {
        (**self).open(url)
    }

    fn set_loading(&self, loading: bool) {
        (**self).set_loading(loading)
    }
}

pub struct DownloadResolver<S, P, O> {
    storage: S,
    service: P,
    opener: O,
    loading: Cell<bool>,
}

impl<S: Storage, P: PlatformIndexService, O: LinkOpener> DownloadResolver<S, P, O> {
    pub fn new(storage: S, service: P, opener: O) -> Self {
        Self {
            storage,
            service,
            opener,
            loading: Cell::new(false),
        }
    }

    /// Whether a service call is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// The preferred mirror index: cached, else asked from the service.
    ///
    /// Only successful answers are cached. An unparsable cached value is
    /// treated as absent.
    pub fn platform_index(&self) -> i64 {
        if let Some(cached) = self.storage.get(STORAGE_KEY) {
            match cached.trim().parse::<i64>() {
                Ok(index) => return index,
                Err(_) => debug!(%cached, "ignoring unparsable cached platform index"),
            }
        }

        self.set_loading(true);
        let answer = self.service.platform_index();
        self.set_loading(false);

        match answer {
            Ok(index) => {
                self.storage.set(STORAGE_KEY, &index.to_string());
                index
            }
            Err(e) => {
                warn!("preference service failed, using first mirror: {e}");
                0
            }
        }
    }

    /// The mirror to offer, or `None` when the book has no links.
    ///
    /// The index is clamped into range, so an index past the end picks the
    /// last mirror.
    pub fn resolve<'a>(&self, links: &'a [DownloadLink]) -> Option<&'a DownloadLink> {
        if links.is_empty() {
            return None;
        }
        let last = links.len() - 1;
        let index = usize::try_from(self.platform_index()).map_or(0, |i| i.min(last));
        links.get(index)
    }

    /// Handle a click on the download button. Navigates only when a mirror
    /// resolves.
    pub fn handle_click<'a>(&self, links: &'a [DownloadLink]) -> Option<&'a DownloadLink> {
        let link = self.resolve(links);
        match link {
            Some(link) => self.opener.open(&link.url),
            None => warn!("no download link available"),
        }
        link
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
        self.opener.set_loading(loading);
    }
}
