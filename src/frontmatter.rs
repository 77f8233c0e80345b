//! Frontmatter extraction and validation.
//!
//! Book files start with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Dế Mèn phiêu lưu ký
//! author: Tô Hoài
//! cover: /images/de-men.jpg
//! downloadLinks:
//!   - url: https://example.com/de-men.epub
//!     platform: Google Drive
//! tags: [thiếu nhi, kinh điển]
//! ---
//! Markdown body...
//! ```
//!
//! Validation works on the raw YAML mapping rather than on [`Book`], so that
//! a wrongly-typed value (e.g. `downloadLinks: "x"`) is reported as a
//! validation failure instead of a deserialization error.
//!
//! [`Book`]: crate::types::Book

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// A single required-field violation.
///
/// The `Display` text is the fixed message reported to the author.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("missing title")]
    MissingTitle,
    #[error("missing author")]
    MissingAuthor,
    #[error("missing cover")]
    MissingCover,
    #[error("missing downloadLinks")]
    MissingDownloadLinks,
    #[error("downloadLinks must have at least 1 item")]
    EmptyDownloadLinks,
}

impl ValidationIssue {
    /// Every issue, in the order checks are applied.
    pub const ALL: [ValidationIssue; 5] = [
        ValidationIssue::MissingTitle,
        ValidationIssue::MissingAuthor,
        ValidationIssue::MissingCover,
        ValidationIssue::MissingDownloadLinks,
        ValidationIssue::EmptyDownloadLinks,
    ];
}

/// Outcome of [`validate`]: every violation found, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Required keys of a book's frontmatter, in check order.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "author", "cover", "downloadLinks"];

/// Check a frontmatter mapping against the required-field rules.
///
/// All rules are applied; nothing short-circuits. The two `downloadLinks`
/// checks are exclusive: a falsy value is "missing", anything else that is
/// not a non-empty sequence is "must have at least 1 item".
pub fn validate(data: &Mapping) -> ValidationResult {
    let mut errors = Vec::new();

    if !is_truthy(data.get("title")) {
        errors.push(ValidationIssue::MissingTitle);
    }
    if !is_truthy(data.get("author")) {
        errors.push(ValidationIssue::MissingAuthor);
    }
    if !is_truthy(data.get("cover")) {
        errors.push(ValidationIssue::MissingCover);
    }

    let links = data.get("downloadLinks");
    if !is_truthy(links) {
        errors.push(ValidationIssue::MissingDownloadLinks);
    } else if !matches!(links, Some(Value::Sequence(items)) if !items.is_empty()) {
        errors.push(ValidationIssue::EmptyDownloadLinks);
    }

    ValidationResult { errors }
}

/// Presence test for a frontmatter value.
///
/// Null, `false`, zero, NaN and the empty string count as absent. Sequences
/// and mappings are present even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Sequence(_)) | Some(Value::Mapping(_)) => true,
        Some(Value::Tagged(tagged)) => is_truthy(Some(&tagged.value)),
    }
}

/// Split a document into its YAML frontmatter and the remaining body.
///
/// Returns `None` when the document has no leading `---` fence or the
/// fence is never closed.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    // An empty block closes immediately on the next line.
    if let Some(body) = rest.strip_prefix("---") {
        return Some(("", trim_fence_newline(body)));
    }

    let end = rest.find("\n---")?;
    let yaml = &rest[..end];
    let after = &rest[end + "\n---".len()..];
    Some((yaml, trim_fence_newline(after)))
}

fn trim_fence_newline(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

/// Parse a document's frontmatter into a YAML mapping plus the body.
///
/// A document without frontmatter, or with an empty block, yields an empty
/// mapping and the whole content as body.
pub fn parse(content: &str) -> Result<(Mapping, &str), serde_yaml::Error> {
    let Some((yaml, body)) = split(content) else {
        return Ok((Mapping::new(), content));
    };
    if yaml.trim().is_empty() {
        return Ok((Mapping::new(), body));
    }
    let value: Value = serde_yaml::from_str(yaml)?;
    let mapping = match value {
        Value::Mapping(m) => m,
        _ => Mapping::new(),
    };
    Ok((mapping, body))
}
