//! SEO meta tags for generated pages.
//!
//! Every page gets a title, description, canonical URL and the Open Graph /
//! Twitter card tags social networks read when a link is shared. Book
//! detail pages are typed `book` and carry the cover as preview image.

use maud::{Markup, html};

use crate::config::SiteInfo;

/// What a page contributes to its meta tags; the site fills the gaps.
#[derive(Debug, Clone, Default)]
pub struct PageMeta<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    /// Site-relative URL, e.g. `/books/so-do/`.
    pub url: &'a str,
    pub cover: Option<&'a str>,
    pub is_book: bool,
}

/// The resolved meta tags of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_title: String,
    pub og_description: String,
    pub og_type: &'static str,
    pub og_url: String,
    pub og_image: Option<String>,
    pub twitter_card: &'static str,
    pub twitter_title: String,
    pub twitter_description: String,
    pub twitter_image: Option<String>,
}

impl SeoMeta {
    /// Resolve a page's meta tags against the site defaults.
    ///
    /// The document title is `"<page> | <site>"`, or just the site name for
    /// untitled pages. Empty page values count as absent.
    pub fn for_page(page: &PageMeta<'_>, site: &SiteInfo) -> Self {
        let page_title = page.title.filter(|t| !t.is_empty());
        let title = match page_title {
            Some(t) => format!("{t} | {}", site.name),
            None => site.name.clone(),
        };
        let short_title = page_title.unwrap_or(&site.name).to_string();
        let description = page
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or(&site.description)
            .to_string();
        let canonical = format!("{}{}", site.url, page.url);
        let image = page.cover.filter(|c| !c.is_empty()).map(str::to_string);

        Self {
            title,
            canonical: canonical.clone(),
            og_title: short_title.clone(),
            og_description: description.clone(),
            og_type: if page.is_book { "book" } else { "website" },
            og_url: canonical,
            og_image: image.clone(),
            twitter_card: "summary_large_image",
            twitter_title: short_title,
            twitter_description: description.clone(),
            twitter_image: image,
            description,
        }
    }

    /// Names of required tags that resolved to an empty value.
    pub fn validate(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("canonical", &self.canonical),
            ("og:title", &self.og_title),
            ("og:description", &self.og_description),
            ("og:url", &self.og_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// The `<head>` elements for these tags, `<title>` included.
    pub fn to_markup(&self) -> Markup {
        html! {
            title { (self.title) }
            meta name="description" content=(self.description);
            link rel="canonical" href=(self.canonical);
            meta property="og:title" content=(self.og_title);
            meta property="og:description" content=(self.og_description);
            meta property="og:type" content=(self.og_type);
            meta property="og:url" content=(self.og_url);
            @if let Some(image) = &self.og_image {
                meta property="og:image" content=(image);
            }
            meta name="twitter:card" content=(self.twitter_card);
            meta name="twitter:title" content=(self.twitter_title);
            meta name="twitter:description" content=(self.twitter_description);
            @if let Some(image) = &self.twitter_image {
                meta name="twitter:image" content=(image);
            }
        }
    }
}
