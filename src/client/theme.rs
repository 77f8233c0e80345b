//! Light/dark theme preference.
//!
//! The chosen theme is persisted under [`STORAGE_KEY`] and applied by
//! toggling a single dark marker on the page (the `dark` class on the root
//! element). Without a stored choice the system color-scheme preference
//! decides.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use super::storage::Storage;

/// Persistent storage key of the chosen theme.
pub const STORAGE_KEY: &str = "ssgepub_theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the exact strings `light` and `dark` parse.
impl FromStr for Theme {
    type Err = InvalidTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(InvalidTheme(other.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid theme: {0:?}")]
pub struct InvalidTheme(pub String);

/// The presentation marker the theme is applied to.
pub trait ThemeTarget {
    fn set_dark(&self, dark: bool);
    fn is_dark(&self) -> bool;
}

impl<T: ThemeTarget + ?Sized> ThemeTarget for &T {
    fn set_dark(&self, dark: bool) {
        (**self).set_dark(dark)
    }

    fn is_dark(&self) -> bool {
        (**self).is_dark()
    }
}

/// A dark marker held in memory.
#[derive(Debug, Default)]
pub struct DarkFlag(AtomicBool);

impl ThemeTarget for DarkFlag {
    fn set_dark(&self, dark: bool) {
        self.0.store(dark, Ordering::Relaxed);
    }

    fn is_dark(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct ThemeManager<S, T> {
    storage: S,
    target: T,
}

impl<S: Storage, T: ThemeTarget> ThemeManager<S, T> {
    pub fn new(storage: S, target: T) -> Self {
        Self { storage, target }
    }

    /// Apply the stored theme, or the system preference when nothing valid
    /// is stored. Nothing is persisted here.
    pub fn init(&self, system_prefers_dark: bool) -> Theme {
        let theme = self.stored().unwrap_or(if system_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        });
        self.apply(theme);
        theme
    }

    /// Current theme: the stored choice, else whatever the marker shows.
    pub fn theme(&self) -> Theme {
        self.stored().unwrap_or(if self.target.is_dark() {
            Theme::Dark
        } else {
            Theme::Light
        })
    }

    /// Persist and apply a theme given by name.
    ///
    /// Anything but `light` or `dark` is logged and coerced to light.
    pub fn set_theme(&self, name: &str) -> Theme {
        let theme: Theme = name.parse().unwrap_or_else(|e: InvalidTheme| {
            warn!("{e}, using 'light' as fallback");
            Theme::Light
        });
        self.set(theme);
        theme
    }

    pub fn set(&self, theme: Theme) {
        self.storage.set(STORAGE_KEY, theme.as_str());
        self.apply(theme);
    }

    /// Flip the current theme and persist the result.
    pub fn toggle(&self) -> Theme {
        let theme = self.theme().toggled();
        self.set(theme);
        theme
    }

    fn stored(&self) -> Option<Theme> {
        self.storage.get(STORAGE_KEY)?.parse().ok()
    }

    fn apply(&self, theme: Theme) {
        self.target.set_dark(theme == Theme::Dark);
    }
}
