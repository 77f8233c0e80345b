//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are overridden by a user config file at the content root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Thư viện Ebook"
//! description = "Thư viện sách điện tử miễn phí"
//! url = "https://example.com"   # No trailing slash
//! language = "vi"
//!
//! [catalog]
//! books_dir = "books"           # Book markdown files, relative to content root
//! pages_dir = "pages"           # Standalone markdown pages
//! assets_dir = "images"         # Copied verbatim to the output root
//! page_size = 12                # Books per listing page
//!
//! [search]
//! index_path = "search-index.json"
//! max_results = 5
//! min_query_len = 2             # Shorter live-input queries hide results
//! threshold = 0.4               # Fuzzy match cutoff, 0 = exact, 1 = anything
//!
//! [download]
//! api_url = ""                  # Empty: always offer the first mirror
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1f2937"
//! card = "#f9fafb"
//! border = "#e5e7eb"
//! primary = "#3b82f6"
//! secondary = "#6b7280"
//!
//! [colors.dark]
//! background = "#111827"
//! text = "#f9fafb"
//! card = "#1f2937"
//! border = "#374151"
//! primary = "#60a5fa"
//! secondary = "#9ca3af"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [catalog]
//! page_size = 24
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity used in titles, meta tags and canonical URLs.
    pub site: SiteInfo,
    /// Content layout and listing pagination.
    pub catalog: CatalogConfig,
    /// Client-side search settings.
    pub search: SearchConfig,
    /// Download mirror resolution.
    pub download: DownloadConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.page_size == 0 {
            return Err(ConfigError::Validation(
                "catalog.page_size must be at least 1".into(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Validation(
                "search.max_results must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(ConfigError::Validation(
                "search.threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if self.site.url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.url must not end with '/'".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
    /// Absolute base URL, without trailing slash.
    pub url: String,
    /// Value of the `<html lang>` attribute.
    pub language: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Thư viện Ebook".to_string(),
            description: "Thư viện sách điện tử miễn phí".to_string(),
            url: "https://example.com".to_string(),
            language: "vi".to_string(),
        }
    }
}

/// Content layout and pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory of book markdown files, relative to the content root.
    pub books_dir: String,
    /// Directory of standalone markdown pages, relative to the content root.
    pub pages_dir: String,
    /// Directory copied verbatim to the output root (covers, favicons).
    pub assets_dir: String,
    /// Books per listing page.
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            books_dir: "books".to_string(),
            pages_dir: "pages".to_string(),
            assets_dir: "images".to_string(),
            page_size: 12,
        }
    }
}

/// Client-side search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Output path of the search index, relative to the site root.
    pub index_path: String,
    /// Maximum number of hits returned per query.
    pub max_results: usize,
    /// Live-input queries shorter than this (in characters) show nothing.
    pub min_query_len: usize,
    /// Fuzzy-match cutoff: a hit's score must not exceed this.
    pub threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_path: "search-index.json".to_string(),
            max_results: 5,
            min_query_len: 2,
            threshold: 0.4,
        }
    }
}

/// Download mirror resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadConfig {
    /// Preference service answering `{"platformIndex": n}`.
    pub api_url: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Card and header background.
    pub card: String,
    /// Border color.
    pub border: String,
    /// Links, buttons, focus rings.
    pub primary: String,
    /// Muted text: authors, breadcrumbs, captions.
    pub secondary: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1f2937".to_string(),
            card: "#f9fafb".to_string(),
            border: "#e5e7eb".to_string(),
            primary: "#3b82f6".to_string(),
            secondary: "#6b7280".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111827".to_string(),
            text: "#f9fafb".to_string(),
            card: "#1f2937".to_string(),
            border: "#374151".to_string(),
            primary: "#60a5fa".to_string(),
            secondary: "#9ca3af".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# ssgepub Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the content directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity (page titles, meta tags, canonical URLs)
# ---------------------------------------------------------------------------
[site]
name = "Thư viện Ebook"
description = "Thư viện sách điện tử miễn phí"
# Absolute base URL, without trailing slash.
url = "https://example.com"
language = "vi"

# ---------------------------------------------------------------------------
# Catalog layout
# ---------------------------------------------------------------------------
[catalog]
# Book markdown files (one book per file, frontmatter required).
books_dir = "books"
# Standalone markdown pages, rendered at /<slug>.html.
pages_dir = "pages"
# Copied verbatim to the output root.
assets_dir = "images"
# Books per listing page.
page_size = 12

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# Where the search index is written, relative to the site root.
index_path = "search-index.json"
# Maximum number of results per query.
max_results = 5
# Live-input queries shorter than this show no results.
min_query_len = 2
# Fuzzy match cutoff: 0.0 = exact match only, 1.0 = match anything.
threshold = 0.4

# ---------------------------------------------------------------------------
# Download mirror resolution
# ---------------------------------------------------------------------------
[download]
# Service answering {"platformIndex": n}; failures fall back to the first link.
# Empty means no service: every download uses the first link.
# api_url = "https://your-worker.workers.dev/api/get-link-platform"
api_url = ""

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1f2937"
card = "#f9fafb"
border = "#e5e7eb"
primary = "#3b82f6"
secondary = "#6b7280"    # Authors, breadcrumbs, captions

# ---------------------------------------------------------------------------
# Colors - Dark mode (html.dark, toggled by the theme button)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111827"
text = "#f9fafb"
card = "#1f2937"
border = "#374151"
primary = "#60a5fa"
secondary = "#9ca3af"
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark values apply under the `dark` class on the root element, which the
/// theme toggle sets; there is no media-query fallback so the stored choice
/// always wins.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-card: {light_card};
    --color-border: {light_border};
    --color-primary: {light_primary};
    --color-secondary: {light_secondary};
}}

html.dark {{
    --color-bg: {dark_bg};
    --color-text: {dark_text};
    --color-card: {dark_card};
    --color-border: {dark_border};
    --color-primary: {dark_primary};
    --color-secondary: {dark_secondary};
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_card = colors.light.card,
        light_border = colors.light.border,
        light_primary = colors.light.primary,
        light_secondary = colors.light.secondary,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_card = colors.dark.card,
        dark_border = colors.dark.border,
        dark_primary = colors.dark.primary,
        dark_secondary = colors.dark.secondary,
    )
}
