//! Book fragment renderers: listing card, detail block and JSON-LD.
//!
//! Each renderer returns its markup together with completeness flags that
//! record whether the key facts of the book actually made it into the
//! output. The page generator only uses the markup; the flags exist so the
//! rendering contract can be checked directly.
//!
//! Markup is built with maud, so every interpolated value is HTML-escaped.
//! The flags therefore look for the *escaped* form of each value, which is
//! exactly the text a browser displays.

use maud::{Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};

use crate::types::Book;

/// Label of the home link in breadcrumbs.
pub const HOME_LABEL: &str = "Trang chủ";

/// Alt-text prefix for cover images ("cover of").
const COVER_ALT_PREFIX: &str = "Bìa sách";

/// HTML-escape text exactly the way maud interpolates it.
pub fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// True when `value` is non-empty and its escaped form appears in `markup`.
fn displays(markup: &str, value: &str) -> bool {
    !value.is_empty() && markup.contains(&escape(value))
}

// ============================================================================
// Card
// ============================================================================

/// A listing card plus its completeness flags.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub markup: Markup,
    pub contains_title: bool,
    pub contains_author: bool,
    pub contains_cover: bool,
}

/// Render the card shown in listing grids.
///
/// The cover is deferred: its URL goes in `data-src` and the client swaps it
/// into `src` once the card scrolls into view. The description overlay is
/// omitted entirely when the book has no description.
pub fn render_card(book: &Book) -> RenderedCard {
    let markup = html! {
        a.book-card href=(book.url()) {
            div.book-card-media {
                img.book-card-image data-src=(book.cover)
                    alt={ (COVER_ALT_PREFIX) " " (book.title) } loading="lazy";
                @if let Some(description) = book.description() {
                    div.book-card-overlay {
                        p { (description) }
                    }
                }
            }
            div.book-card-content {
                h2.book-card-title { (book.title) }
                p.book-card-author { (book.author) }
            }
        }
    };

    let text = markup.0.as_str();
    RenderedCard {
        contains_title: displays(text, &book.title),
        contains_author: displays(text, &book.author),
        contains_cover: displays(text, &book.cover),
        markup,
    }
}

// ============================================================================
// Detail
// ============================================================================

/// The detail block plus its completeness flags.
#[derive(Debug, Clone)]
pub struct RenderedDetail {
    pub markup: Markup,
    pub contains_cover: bool,
    pub contains_title: bool,
    pub contains_author: bool,
    /// Vacuously true for a book without tags.
    pub contains_tags: bool,
    pub contains_breadcrumb: bool,
}

/// Render the top of a detail page: breadcrumb, cover and book info.
///
/// The cover loads eagerly here since it is the page's main image.
pub fn render_detail(book: &Book) -> RenderedDetail {
    let markup = html! {
        div.detail-container {
            nav.breadcrumb aria-label="Breadcrumb" {
                a href="/" { (HOME_LABEL) }
                span.breadcrumb-separator { "›" }
                span.breadcrumb-current { (book.title) }
            }
            div.detail-header {
                div.detail-cover {
                    img src=(book.cover) alt={ (COVER_ALT_PREFIX) " " (book.title) };
                }
                div.detail-info {
                    h1.detail-title { (book.title) }
                    p.detail-author { (book.author) }
                    @if let Some(description) = book.description() {
                        p.detail-description { (description) }
                    }
                    @if !book.tags.is_empty() {
                        div.detail-tags {
                            @for tag in &book.tags {
                                span.tag { (tag) }
                            }
                        }
                    }
                }
            }
        }
    };

    let text = markup.0.as_str();
    RenderedDetail {
        contains_cover: displays(text, &book.cover),
        contains_title: displays(text, &book.title),
        contains_author: displays(text, &book.author),
        contains_tags: book.tags.iter().all(|tag| text.contains(&escape(tag))),
        contains_breadcrumb: text.contains(HOME_LABEL) && displays(text, &book.title),
        markup,
    }
}

// ============================================================================
// Structured data
// ============================================================================

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// schema.org `Book` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSchema {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub author: PersonSchema,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
}

/// schema.org `Person` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSchema {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
}

impl BookSchema {
    /// Whether the fixed tags are correct and every required value is set.
    pub fn is_valid(&self) -> bool {
        self.context == SCHEMA_CONTEXT
            && self.kind == "Book"
            && !self.name.is_empty()
            && self.author.kind == "Person"
            && !self.author.name.is_empty()
            && !self.image.is_empty()
    }

    /// JSON suitable for embedding inside a `<script>` element.
    ///
    /// `</` is escaped so a title cannot close the script early.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }
}

/// A JSON-LD payload plus its validity and completeness flags.
#[derive(Debug, Clone)]
pub struct StructuredData {
    pub payload: BookSchema,
    pub is_valid: bool,
    pub contains_title: bool,
    pub contains_author: bool,
    pub contains_image: bool,
}

/// Build the schema.org `Book` description of a book.
///
/// `description` is only present when the book has one, `genre` only when
/// it has tags (copied verbatim, order kept).
pub fn to_structured_data(book: &Book) -> StructuredData {
    let payload = BookSchema {
        context: SCHEMA_CONTEXT.to_string(),
        kind: "Book".to_string(),
        name: book.title.clone(),
        author: PersonSchema {
            kind: "Person".to_string(),
            name: book.author.clone(),
        },
        image: book.cover.clone(),
        description: book.description().map(str::to_string),
        genre: (!book.tags.is_empty()).then(|| book.tags.clone()),
    };

    StructuredData {
        is_valid: payload.is_valid(),
        contains_title: payload.name == book.title,
        contains_author: payload.author.name == book.author,
        contains_image: payload.image == book.cover,
        payload,
    }
}

/// `<script type="application/ld+json">` block for a detail page.
pub fn structured_data_script(book: &Book) -> Result<Markup, serde_json::Error> {
    let json = to_structured_data(book).payload.to_script_json()?;
    Ok(html! {
        script type="application/ld+json" { (PreEscaped(json)) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::book;

    fn described(title: &str, description: &str) -> Book {
        let mut b = book(title);
        b.description = Some(description.to_string());
        b
    }

    // =========================================================================
    // Card
    // =========================================================================

    #[test]
    fn card_contains_title_author_cover() {
        let card = render_card(&book("Số đỏ"));
        assert!(card.contains_title);
        assert!(card.contains_author);
        assert!(card.contains_cover);
    }

    #[test]
    fn card_links_to_detail_directory() {
        let mut b = book("Số đỏ");
        b.slug = "so-do".into();
        let html = render_card(&b).markup.into_string();
        assert!(html.contains(r#"href="/books/so-do/""#));
    }

    #[test]
    fn card_defers_cover_loading() {
        let html = render_card(&book("X")).markup.into_string();
        assert!(html.contains(r#"data-src="https://example.com/cover.jpg""#));
        assert!(!html.contains(" src="));
        assert!(html.contains(r#"loading="lazy""#));
    }

    #[test]
    fn card_overlay_only_with_description() {
        let with = render_card(&described("X", "Một câu chuyện")).markup.into_string();
        assert!(with.contains("book-card-overlay"));
        assert!(with.contains("Một câu chuyện"));

        let without = render_card(&book("X")).markup.into_string();
        assert!(!without.contains("book-card-overlay"));

        let empty = render_card(&described("X", "")).markup.into_string();
        assert!(!empty.contains("book-card-overlay"));
    }

    #[test]
    fn card_escapes_markup_in_title() {
        let card = render_card(&book("<b>Tom & Jerry</b>"));
        let html = card.markup.0.as_str();
        assert!(!html.contains("<b>Tom"));
        assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
        assert!(card.contains_title);
    }

    #[test]
    fn card_flags_false_for_empty_values() {
        let mut b = book("X");
        b.author = String::new();
        assert!(!render_card(&b).contains_author);
    }

    // =========================================================================
    // Detail
    // =========================================================================

    #[test]
    fn detail_contains_everything() {
        let mut b = described("Truyện Kiều", "Kiệt tác");
        b.tags = vec!["thơ".into(), "kinh điển".into()];
        let detail = render_detail(&b);
        assert!(detail.contains_cover);
        assert!(detail.contains_title);
        assert!(detail.contains_author);
        assert!(detail.contains_tags);
        assert!(detail.contains_breadcrumb);

        let html = detail.markup.into_string();
        assert!(html.contains(r#"class="detail-container""#));
        assert!(html.contains(r#"aria-label="Breadcrumb""#));
        assert!(html.contains("detail-tags"));
        assert!(html.contains("Kiệt tác"));
    }

    #[test]
    fn detail_loads_cover_eagerly() {
        let html = render_detail(&book("X")).markup.into_string();
        assert!(html.contains(r#"src="https://example.com/cover.jpg""#));
        assert!(!html.contains("data-src"));
    }

    #[test]
    fn detail_breadcrumb_precedes_header() {
        let html = render_detail(&book("X")).markup.into_string();
        let crumb = html.find("breadcrumb").unwrap();
        let header = html.find("detail-header").unwrap();
        assert!(crumb < header);
        assert!(html.contains(HOME_LABEL));
    }

    #[test]
    fn detail_without_tags_omits_tag_list() {
        let detail = render_detail(&book("X"));
        assert!(detail.contains_tags);
        assert!(!detail.markup.0.as_str().contains("detail-tags"));
    }

    #[test]
    fn detail_one_element_per_tag() {
        let mut b = book("X");
        b.tags = vec!["a".into(), "b".into(), "c".into()];
        let html = render_detail(&b).markup.into_string();
        assert_eq!(html.matches(r#"class="tag""#).count(), 3);
    }

    // =========================================================================
    // Structured data
    // =========================================================================

    #[test]
    fn structured_data_required_fields() {
        let data = to_structured_data(&book("Số đỏ"));
        assert!(data.is_valid);
        assert!(data.contains_title);
        assert!(data.contains_author);
        assert!(data.contains_image);
        assert_eq!(data.payload.context, "https://schema.org");
        assert_eq!(data.payload.kind, "Book");
        assert_eq!(data.payload.author.kind, "Person");
    }

    #[test]
    fn structured_data_optional_keys_absent() {
        let json = serde_json::to_value(to_structured_data(&book("X")).payload).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("genre").is_none());
        assert_eq!(json["@type"], "Book");
        assert_eq!(json["author"]["@type"], "Person");
    }

    #[test]
    fn structured_data_genre_is_tags_verbatim() {
        let mut b = described("X", "Mô tả");
        b.tags = vec!["b".into(), "a".into(), "b".into()];
        let payload = to_structured_data(&b).payload;
        assert_eq!(payload.genre, Some(b.tags.clone()));
        assert_eq!(payload.description.as_deref(), Some("Mô tả"));
    }

    #[test]
    fn structured_data_roundtrips_through_json() {
        let mut b = described("\"Quoted\" & <tagged>", "d");
        b.tags = vec!["t".into()];
        let payload = to_structured_data(&b).payload;
        let text = serde_json::to_string(&payload).unwrap();
        let back: BookSchema = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn structured_data_invalid_when_title_empty() {
        let mut b = book("X");
        b.title = String::new();
        assert!(!to_structured_data(&b).is_valid);
    }

    #[test]
    fn script_json_cannot_close_script() {
        let b = book("</script><script>alert(1)</script>");
        let html = structured_data_script(&b).unwrap().into_string();
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("application/ld+json"));
    }
}
