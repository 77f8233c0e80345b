//! HTML site generation.
//!
//! Stage 3 of the ssgepub build pipeline. Takes the scanned manifest and
//! writes the final static site.
//!
//! ## Generated Pages
//!
//! - **Home pages** (`/index.html`, `/page/{n}/index.html`): alphabetical
//!   grid of book cards, `page_size` per page, with previous/next links
//! - **Book pages** (`/books/{slug}/index.html`): breadcrumb, cover, book
//!   info, markdown body, download button and JSON-LD
//! - **Search page** (`/search.html`): results are filled in client side
//! - **Pages** (`/{slug}.html`): markdown from `pages/`
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Home, page 1
//! ├── page/2/index.html          # Home, later pages
//! ├── books/
//! │   └── so-do/index.html       # Book detail page
//! ├── search.html
//! ├── search-index.json          # Client search index
//! ├── gioi-thieu.html            # Markdown page
//! ├── css/style.css
//! ├── js/site.js
//! └── images/                    # Copied from the content root
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors are inlined per page from config)
//! - `static/site.js`: Theme toggle, lazy covers, search and downloads
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::collection::{paginate, project_search_index, sort_alphabetically};
use crate::config::{self, SiteConfig};
use crate::naming::{detail_page_url, home_page_url, output_path};
use crate::render::{self, HOME_LABEL};
use crate::scan::Manifest;
use crate::seo::{PageMeta, SeoMeta};
use crate::types::{Book, Page};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{CowStr, Event, LinkType, Parser, Tag, TagEnd, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

pub const CSS_URL: &str = "/css/style.css";
pub const JS_URL: &str = "/js/site.js";
pub const SEARCH_PAGE_URL: &str = "/search.html";

const SEARCH_LABEL: &str = "Tìm kiếm";
const SEARCH_PLACEHOLDER: &str = "Tìm sách, tác giả...";
const THEME_TOGGLE_LABEL: &str = "Chuyển giao diện sáng/tối";
const DOWNLOAD_LABEL: &str = "Tải xuống";
const EMPTY_CATALOG: &str = "Chưa có sách nào.";

/// One generated page: what it shows and where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub title: String,
    /// Output path relative to the output directory.
    pub path: String,
}

/// Everything the generate stage wrote, for CLI output.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub home_pages: Vec<String>,
    /// Book pages in alphabetical order.
    pub books: Vec<GeneratedPage>,
    pub pages: Vec<GeneratedPage>,
    pub search_index: String,
    pub search_entries: usize,
    pub assets_copied: usize,
}

pub fn generate(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;
    let layout = Layout::new(config);
    let mut report = GenerateReport::default();

    fs::create_dir_all(output_dir)?;
    write_file(output_dir, CSS_URL, CSS_STATIC)?;
    write_file(output_dir, JS_URL, JS)?;

    let sorted = sort_alphabetically(&manifest.books);

    // Home pages
    let pages = paginate(&sorted, config.catalog.page_size);
    for (idx, books) in pages.iter().enumerate() {
        let url = home_page_url(idx + 1);
        let html = render_home_page(&layout, books, idx + 1, pages.len());
        write_file(output_dir, &url, &html.into_string())?;
        report.home_pages.push(output_path(&url));
    }

    // Book pages render in parallel; nothing is shared between books.
    let rendered = sorted
        .par_iter()
        .map(|book| render_book_page(&layout, book).map(|html| (*book, html.into_string())))
        .collect::<Result<Vec<_>, serde_json::Error>>()?;
    for (book, html) in rendered {
        let url = detail_page_url(&book.slug);
        write_file(output_dir, &url, &html)?;
        report.books.push(GeneratedPage {
            title: book.title.clone(),
            path: output_path(&url),
        });
    }

    // Search
    let index = project_search_index(sorted.iter().copied());
    let index_url = format!("/{}", config.search.index_path);
    write_file(output_dir, &index_url, &serde_json::to_string_pretty(&index)?)?;
    report.search_index = output_path(&index_url);
    report.search_entries = index.len();
    write_file(
        output_dir,
        SEARCH_PAGE_URL,
        &render_search_page(&layout).into_string(),
    )?;

    // Markdown pages
    for page in &manifest.pages {
        let url = format!("/{}.html", page.slug);
        write_file(output_dir, &url, &render_markdown_page(&layout, page).into_string())?;
        report.pages.push(GeneratedPage {
            title: page.title.clone(),
            path: output_path(&url),
        });
    }

    report.assets_copied = copy_assets(
        &source_root.join(&config.catalog.assets_dir),
        &output_dir.join(&config.catalog.assets_dir),
    )?;

    Ok(report)
}

/// Write `contents` to the file a site URL maps to, creating directories.
fn write_file(output_dir: &Path, url: &str, contents: &str) -> std::io::Result<()> {
    let path = output_dir.join(output_path(url));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!(path = %path.display(), "writing");
    fs::write(path, contents)
}

/// Copy the passthrough assets directory verbatim. Hidden files are skipped.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    let entries = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));
    for entry in entries {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Render markdown with single newlines kept as line breaks and bare
/// `http(s)://` URLs turned into links.
fn markdown_to_html(markdown: &str) -> Markup {
    let mut events = Vec::new();
    let mut in_link = 0usize;
    let mut in_code_block = false;
    for event in Parser::new(markdown) {
        match event {
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Start(Tag::Link { .. }) => {
                in_link += 1;
                events.push(event);
            }
            Event::End(TagEnd::Link) => {
                in_link = in_link.saturating_sub(1);
                events.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(event);
            }
            Event::Text(text) if in_link == 0 && !in_code_block => linkify(&text, &mut events),
            other => events.push(other),
        }
    }
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, events.into_iter());
    PreEscaped(body_html)
}

/// Split text around bare URLs, emitting each URL as an autolink.
fn linkify<'a>(text: &str, events: &mut Vec<Event<'a>>) {
    let mut rest = text;
    while let Some(start) = find_url_start(rest) {
        let candidate = &rest[start..];
        let end = candidate
            .find(char::is_whitespace)
            .unwrap_or(candidate.len());
        let url = candidate[..end].trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '"', '\'']);
        if url.ends_with("://") {
            events.push(Event::Text(CowStr::from(rest[..start + url.len()].to_string())));
            rest = &rest[start + url.len()..];
            continue;
        }
        if start > 0 {
            events.push(Event::Text(CowStr::from(rest[..start].to_string())));
        }
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(url.to_string()),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(CowStr::from(url.to_string())));
        events.push(Event::End(TagEnd::Link));
        rest = &rest[start + url.len()..];
    }
    if !rest.is_empty() {
        events.push(Event::Text(CowStr::from(rest.to_string())));
    }
}

fn find_url_start(text: &str) -> Option<usize> {
    match (text.find("https://"), text.find("http://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Site-wide page chrome, shared by every page renderer.
struct Layout<'a> {
    config: &'a SiteConfig,
    color_css: String,
}

impl<'a> Layout<'a> {
    fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            color_css: config::generate_color_css(&config.colors),
        }
    }

    /// Renders the base HTML document structure
    ///
    /// The body carries the search settings as data attributes so the
    /// client script reads them instead of hard-coding its own.
    fn document(&self, meta: &SeoMeta, body_class: Option<&str>, content: Markup) -> Markup {
        let site = &self.config.site;
        let search = &self.config.search;
        html! {
            (DOCTYPE)
            html lang=(site.language) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    (meta.to_markup())
                    style { (PreEscaped(&self.color_css)) }
                    link rel="stylesheet" href=(CSS_URL);
                }
                body class=[body_class]
                    data-search-index={ "/" (search.index_path) }
                    data-search-max=(search.max_results)
                    data-search-min=(search.min_query_len)
                    data-search-threshold=(search.threshold) {
                    (self.header())
                    main { (content) }
                    footer.site-footer { "© " (site.name) }
                    script src=(JS_URL) {}
                }
            }
        }
    }

    /// Renders the site header: home link, search forms and theme toggle
    fn header(&self) -> Markup {
        html! {
            header.site-header {
                a.site-title href="/" { (self.config.site.name) }
                form #search-form .search-form .desktop-only action=(SEARCH_PAGE_URL) method="get" role="search" {
                    input #search-input type="search" name="q" autocomplete="off"
                        placeholder=(SEARCH_PLACEHOLDER) aria-label=(SEARCH_LABEL);
                    div #search-results .search-results .hidden {}
                }
                button #mobile-search-toggle .icon-button .mobile-only type="button" aria-label=(SEARCH_LABEL) {
                    "⌕"
                }
                button #theme-toggle .icon-button type="button" aria-label=(THEME_TOGGLE_LABEL) {
                    "◐"
                }
            }
            div #mobile-search-container .mobile-search .hidden {
                form #mobile-search-form .search-form action=(SEARCH_PAGE_URL) method="get" role="search" {
                    input #mobile-search-input type="search" name="q" autocomplete="off"
                        placeholder=(SEARCH_PLACEHOLDER) aria-label=(SEARCH_LABEL);
                    div #mobile-search-results .search-results .hidden {}
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders page `n` of `total` of the home listing
fn render_home_page(layout: &Layout<'_>, books: &[&Book], n: usize, total: usize) -> Markup {
    let url = home_page_url(n);
    let title = format!("Trang {n}");
    let meta = SeoMeta::for_page(
        &PageMeta {
            title: (n > 1).then_some(title.as_str()),
            url: &url,
            ..Default::default()
        },
        &layout.config.site,
    );

    let content = html! {
        @if books.is_empty() {
            p.empty-catalog { (EMPTY_CATALOG) }
        } @else {
            div.book-grid {
                @for book in books {
                    (render::render_card(book).markup)
                }
            }
        }
        @if total > 1 {
            nav.pagination aria-label="Pagination" {
                @if n > 1 {
                    a.pagination-prev href=(home_page_url(n - 1)) rel="prev" { "« Trang trước" }
                }
                span.pagination-status { "Trang " (n) " / " (total) }
                @if n < total {
                    a.pagination-next href=(home_page_url(n + 1)) rel="next" { "Trang sau »" }
                }
            }
        }
    };

    layout.document(&meta, Some("home"), content)
}

/// Renders a book's detail page
fn render_book_page(layout: &Layout<'_>, book: &Book) -> Result<Markup, serde_json::Error> {
    let url = book.url();
    let meta = SeoMeta::for_page(
        &PageMeta {
            title: Some(&book.title),
            description: book.description(),
            url: &url,
            cover: Some(&book.cover),
            is_book: true,
        },
        &layout.config.site,
    );
    let links = serde_json::to_string(&book.download_links)?;
    let structured_data = render::structured_data_script(book)?;

    let content = html! {
        (render::render_detail(book).markup)
        div.detail-actions {
            @if let Some(date) = &book.publish_date {
                p.publish-date { "Ngày xuất bản: " (date) }
            }
            button #download-btn .download-btn type="button"
                data-links=(links) data-api=(layout.config.download.api_url) {
                (DOWNLOAD_LABEL)
            }
        }
        @if !book.body.trim().is_empty() {
            article.book-body { (markdown_to_html(&book.body)) }
        }
        (structured_data)
    };

    Ok(layout.document(&meta, Some("book"), content))
}

/// Renders the search page; the client fills in results from `?q=`
fn render_search_page(layout: &Layout<'_>) -> Markup {
    let meta = SeoMeta::for_page(
        &PageMeta {
            title: Some(SEARCH_LABEL),
            url: SEARCH_PAGE_URL,
            ..Default::default()
        },
        &layout.config.site,
    );

    let content = html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { (HOME_LABEL) }
            span.breadcrumb-separator { "›" }
            span.breadcrumb-current { (SEARCH_LABEL) }
        }
        h1 { (SEARCH_LABEL) }
        p #search-page-query .search-page-query {}
        div #search-page-results .search-page-results {}
    };

    layout.document(&meta, Some("search"), content)
}

/// Renders a standalone page from markdown content
fn render_markdown_page(layout: &Layout<'_>, page: &Page) -> Markup {
    let url = format!("/{}.html", page.slug);
    let meta = SeoMeta::for_page(
        &PageMeta {
            title: Some(&page.title),
            url: &url,
            ..Default::default()
        },
        &layout.config.site,
    );

    let content = html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { (HOME_LABEL) }
            span.breadcrumb-separator { "›" }
            span.breadcrumb-current { (page.title) }
        }
        article.page-content {
            (markdown_to_html(&page.body))
        }
    };

    layout.document(&meta, Some("page"), content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn read(dir: &Path, rel: &str) -> String {
        fs::read_to_string(dir.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
    }

    fn build(tmp: &TempDir) -> (TempDir, GenerateReport) {
        let out = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        let report = generate(&manifest, tmp.path(), out.path()).unwrap();
        (out, report)
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn document_has_lang_meta_and_assets() {
        let config = SiteConfig::default();
        let layout = Layout::new(&config);
        let meta = SeoMeta::for_page(
            &PageMeta {
                url: "/",
                ..Default::default()
            },
            &config.site,
        );
        let html = layout.document(&meta, None, html! { "x" }).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="vi">"#));
        assert!(html.contains(r#"rel="canonical""#));
        assert!(html.contains("--color-bg"));
        assert!(html.contains("html.dark"));
        assert!(html.contains(r#"href="/css/style.css""#));
        assert!(html.contains(r#"src="/js/site.js""#));
        assert!(html.contains(r#"data-search-index="/search-index.json""#));
    }

    #[test]
    fn header_has_both_search_forms_and_toggle() {
        let config = SiteConfig::default();
        let html = Layout::new(&config).header().into_string();
        assert!(html.contains(r#"id="search-form""#));
        assert!(html.contains(r#"id="mobile-search-form""#));
        assert!(html.contains(r#"id="theme-toggle""#));
        assert_eq!(html.matches(r#"name="q""#).count(), 2);
        assert_eq!(html.matches(r#"action="/search.html""#).count(), 2);
    }

    #[test]
    fn home_page_pagination_links() {
        let config = SiteConfig::default();
        let layout = Layout::new(&config);
        let b = book("A");
        let books = [&b];

        let first = render_home_page(&layout, &books, 1, 3).into_string();
        assert!(!first.contains("pagination-prev"));
        assert!(first.contains(r#"href="/page/2/""#));

        let middle = render_home_page(&layout, &books, 2, 3).into_string();
        assert!(middle.contains(r#"class="pagination-prev" href="/""#));
        assert!(middle.contains(r#"href="/page/3/""#));
        assert!(middle.contains("Trang 2 / 3"));

        let single = render_home_page(&layout, &books, 1, 1).into_string();
        assert!(!single.contains("pagination"));
    }

    #[test]
    fn empty_home_page_shows_message() {
        let config = SiteConfig::default();
        let html = render_home_page(&Layout::new(&config), &[], 1, 1).into_string();
        assert!(html.contains(EMPTY_CATALOG));
        assert!(!html.contains("book-grid"));
    }

    #[test]
    fn book_page_has_download_data_and_json_ld() {
        let config = SiteConfig::default();
        let mut b = book("Số đỏ");
        b.body = "# Chương 1\n\n*Xuân Tóc Đỏ*".into();
        b.publish_date = Some("1936".into());
        let html = render_book_page(&Layout::new(&config), &b)
            .unwrap()
            .into_string();
        assert!(html.contains(r#"id="download-btn""#));
        assert!(html.contains("data-links=\"[{&quot;url&quot;:&quot;https://example.com/book.epub&quot;"));
        assert!(html.contains(r#"type="application/ld+json""#));
        assert!(html.contains("<em>Xuân Tóc Đỏ</em>"));
        assert!(html.contains("Ngày xuất bản: 1936"));
        assert!(html.contains(r#"property="og:type" content="book""#));
        assert!(html.contains("<title>Số đỏ | "));
    }

    #[test]
    fn book_page_without_body_has_no_article() {
        let config = SiteConfig::default();
        let html = render_book_page(&Layout::new(&config), &book("A"))
            .unwrap()
            .into_string();
        assert!(!html.contains("book-body"));
    }

    #[test]
    fn html_escape_in_maud() {
        let config = SiteConfig::default();
        let b = book("<script>alert(1)</script>");
        let html = render_book_page(&Layout::new(&config), &b)
            .unwrap()
            .into_string();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn markdown_keeps_single_newlines_as_breaks() {
        let html = markdown_to_html("Dòng một\nDòng hai\n\nĐoạn mới").into_string();
        assert!(html.contains("Dòng một<br />"));
        assert!(html.contains("<p>Đoạn mới</p>"));
    }

    #[test]
    fn markdown_links_bare_urls() {
        let html = markdown_to_html("Xem https://example.com/sach, rồi tải.").into_string();
        assert!(html.contains(r#"<a href="https://example.com/sach">https://example.com/sach</a>, rồi tải."#));
    }

    #[test]
    fn markdown_leaves_existing_links_and_code_alone() {
        let html = markdown_to_html(
            "[trang](https://example.com/a)\n\n```\nhttps://example.com/code\n```\n",
        )
        .into_string();
        assert!(html.contains(r#"<a href="https://example.com/a">trang</a>"#));
        assert!(html.contains("<code>https://example.com/code\n</code>"));
        assert!(!html.contains(r#"href="https://example.com/code""#));
    }

    #[test]
    fn download_button_without_service_has_empty_api() {
        let config = SiteConfig::default();
        let html = render_book_page(&Layout::new(&config), &book("A"))
            .unwrap()
            .into_string();
        assert!(html.contains(r#"data-api="""#));
    }

    // =========================================================================
    // Full generation
    // =========================================================================

    #[test]
    fn generates_every_output_file() {
        let tmp = setup_content(&[
            ("so-do", &book_md("Số đỏ", "Vũ Trọng Phụng")),
            ("an-nam", &book_md("An Nam", "X")),
        ]);
        let pages = tmp.path().join("pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("gioi-thieu.md"), "# Giới thiệu\n\nXin chào.").unwrap();

        let (out, report) = build(&tmp);
        for rel in [
            "index.html",
            "books/so-do/index.html",
            "books/an-nam/index.html",
            "search.html",
            "search-index.json",
            "gioi-thieu.html",
            "css/style.css",
            "js/site.js",
        ] {
            assert!(out.path().join(rel).is_file(), "missing {rel}");
        }
        assert_eq!(report.home_pages, vec!["index.html"]);
        assert_eq!(report.books[0].title, "An Nam");
        assert_eq!(report.books[0].path, "books/an-nam/index.html");
        assert_eq!(report.pages[0].path, "gioi-thieu.html");
        assert_eq!(report.search_entries, 2);
    }

    #[test]
    fn home_lists_books_alphabetically() {
        let tmp = setup_content(&[
            ("b", &book_md("Đất rừng phương Nam", "Đoàn Giỏi")),
            ("a", &book_md("Dế mèn", "Tô Hoài")),
            ("c", &book_md("Bỉ vỏ", "Nguyên Hồng")),
        ]);
        let (out, _) = build(&tmp);
        let home = read(out.path(), "index.html");
        let pos = |t: &str| home.find(t).unwrap_or_else(|| panic!("{t} missing"));
        assert!(pos("Bỉ vỏ") < pos("Dế mèn"));
        assert!(pos("Dế mèn") < pos("Đất rừng phương Nam"));
        assert!(home.contains(r#"href="/books/a/""#));
    }

    #[test]
    fn paginates_home_by_config_page_size() {
        let tmp = setup_content(&[
            ("a", &book_md("A", "X")),
            ("b", &book_md("B", "X")),
            ("c", &book_md("C", "X")),
        ]);
        fs::write(tmp.path().join("config.toml"), "[catalog]\npage_size = 2\n").unwrap();
        let (out, report) = build(&tmp);
        assert_eq!(report.home_pages, vec!["index.html", "page/2/index.html"]);
        let second = read(out.path(), "page/2/index.html");
        assert!(second.contains(r#"href="/books/c/""#));
        assert!(!second.contains(r#"href="/books/a/""#));
    }

    #[test]
    fn empty_catalog_still_has_home_page() {
        let tmp = TempDir::new().unwrap();
        let (out, report) = build(&tmp);
        assert_eq!(report.home_pages, vec!["index.html"]);
        assert!(read(out.path(), "index.html").contains(EMPTY_CATALOG));
        assert_eq!(read(out.path(), "search-index.json").trim(), "[]");
    }

    #[test]
    fn search_index_is_sorted_entries() {
        let tmp = setup_content(&[("z", &book_md("Z", "X")), ("a", &book_md("A", "Y"))]);
        let (out, _) = build(&tmp);
        let index: Vec<crate::types::SearchIndexEntry> =
            serde_json::from_str(&read(out.path(), "search-index.json")).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].title, "A");
        assert_eq!(index[0].url, "/books/a/");
        assert_eq!(index[1].author, "X");
    }

    #[test]
    fn copies_assets_verbatim() {
        let tmp = setup_content(&[]);
        let images = tmp.path().join("images/covers");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("a.jpg"), b"jpeg").unwrap();
        fs::write(tmp.path().join("images/.DS_Store"), b"junk").unwrap();

        let (out, report) = build(&tmp);
        assert_eq!(report.assets_copied, 1);
        assert_eq!(fs::read(out.path().join("images/covers/a.jpg")).unwrap(), b"jpeg");
        assert!(!out.path().join("images/.DS_Store").exists());
    }

    #[test]
    fn index_page_cannot_replace_home() {
        let tmp = setup_content(&[("a", &book_md("A", "X"))]);
        let pages = tmp.path().join("pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("index.md"), "# About us\n").unwrap();
        assert!(matches!(
            scan(tmp.path()),
            Err(crate::scan::ScanError::ReservedPageSlug { .. })
        ));
    }

    #[test]
    fn stylesheet_and_script_are_embedded_copies() {
        let tmp = TempDir::new().unwrap();
        let (out, _) = build(&tmp);
        assert_eq!(read(out.path(), "css/style.css"), CSS_STATIC);
        assert_eq!(read(out.path(), "js/site.js"), JS);
    }
}
