//! End-to-end tests: run the compiled binary against a temp content tree.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn book_md(title: &str, author: &str, mirrors: &[&str]) -> String {
    let links: String = mirrors
        .iter()
        .map(|m| format!("  - url: https://{m}.example/book.epub\n    platform: {m}\n"))
        .collect();
    format!(
        "---\ntitle: \"{title}\"\nauthor: \"{author}\"\ncover: /images/cover.jpg\n\
         downloadLinks:\n{links}tags: [văn học]\n---\n# {title}\n\nNội dung.\n"
    )
}

/// A content root with three books, a page and an asset. No preference
/// service is configured so nothing leaves the machine.
fn content(page_size: usize) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("content");
    fs::create_dir_all(root.join("books")).unwrap();
    fs::create_dir_all(root.join("pages")).unwrap();
    fs::create_dir_all(root.join("images")).unwrap();

    fs::write(
        root.join("config.toml"),
        format!("[catalog]\npage_size = {page_size}\n\n[download]\napi_url = \"\"\n"),
    )
    .unwrap();
    fs::write(
        root.join("books/truyen-kieu.md"),
        book_md("Truyện Kiều", "Nguyễn Du", &["drive", "mega"]),
    )
    .unwrap();
    fs::write(
        root.join("books/so-do.md"),
        book_md("Số đỏ", "Vũ Trọng Phụng", &["drive"]),
    )
    .unwrap();
    fs::write(
        root.join("books/de-men.md"),
        book_md("Dế Mèn phiêu lưu ký", "Tô Hoài", &["drive"]),
    )
    .unwrap();
    fs::write(root.join("pages/gioi-thieu.md"), "# Giới thiệu\n\nXin chào.\n").unwrap();
    fs::write(root.join("images/cover.jpg"), b"jpg").unwrap();
    tmp
}

fn ssgepub(tmp: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ssgepub"))
        .current_dir(tmp)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =========================================================================
// build
// =========================================================================

#[test]
fn build_writes_the_whole_site() {
    let tmp = content(12);
    let out = ssgepub(tmp.path(), &["build"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let dist = tmp.path().join("dist");
    for file in [
        "index.html",
        "books/truyen-kieu/index.html",
        "books/so-do/index.html",
        "books/de-men/index.html",
        "search.html",
        "search-index.json",
        "gioi-thieu.html",
        "css/style.css",
        "js/site.js",
        "images/cover.jpg",
    ] {
        assert!(dist.join(file).exists(), "missing {file}");
    }
    assert!(tmp.path().join(".ssgepub-temp/manifest.json").exists());

    let text = stdout(&out);
    assert!(text.contains("==> Stage 1: Scanning"));
    assert!(text.contains("==> Build complete"));
    assert!(text.contains("Generated 3 books, 1 home pages, 1 pages"));
}

#[test]
fn home_page_lists_books_in_vietnamese_order() {
    let tmp = content(12);
    assert!(ssgepub(tmp.path(), &["build"]).status.success());

    let html = fs::read_to_string(tmp.path().join("dist/index.html")).unwrap();
    let de_men = html.find("Dế Mèn phiêu lưu ký").unwrap();
    let so_do = html.find("Số đỏ").unwrap();
    let kieu = html.find("Truyện Kiều").unwrap();
    assert!(de_men < so_do && so_do < kieu);
    assert!(html.contains("<html lang=\"vi\">"));
}

#[test]
fn search_index_matches_sorted_catalog() {
    let tmp = content(12);
    assert!(ssgepub(tmp.path(), &["build"]).status.success());

    let json = fs::read_to_string(tmp.path().join("dist/search-index.json")).unwrap();
    let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    let urls: Vec<&str> = entries.iter().map(|e| e["url"].as_str().unwrap()).collect();
    assert_eq!(urls, vec!["/books/de-men/", "/books/so-do/", "/books/truyen-kieu/"]);
    assert_eq!(entries[0]["description"], "");
    assert_eq!(entries[0]["tags"], serde_json::json!(["văn học"]));
}

#[test]
fn small_page_size_paginates_home() {
    let tmp = content(1);
    let out = ssgepub(tmp.path(), &["build"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let dist = tmp.path().join("dist");
    assert!(dist.join("index.html").exists());
    assert!(dist.join("page/2/index.html").exists());
    assert!(dist.join("page/3/index.html").exists());
    assert!(!dist.join("page/4/index.html").exists());
}

#[test]
fn invalid_book_aborts_build() {
    let tmp = content(12);
    fs::write(
        tmp.path().join("content/books/broken.md"),
        "---\ntitle: Hỏng\ndownloadLinks: []\n---\n",
    )
    .unwrap();

    let out = ssgepub(tmp.path(), &["build"]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("Build Error in"), "stderr: {err}");
    assert!(err.contains("broken.md"));
    assert!(err.contains("missing author"));
    assert!(err.contains("missing cover"));
    assert!(err.contains("downloadLinks must have at least 1 item"));
    assert!(!tmp.path().join("dist/index.html").exists());
}

// =========================================================================
// check / scan / gen-config
// =========================================================================

#[test]
fn check_reports_valid_content() {
    let tmp = content(12);
    let out = ssgepub(tmp.path(), &["check"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("3 books valid, 1 pages"));
    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn scan_lists_books_in_file_order() {
    let tmp = content(12);
    let out = ssgepub(tmp.path(), &["scan"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("001 Dế Mèn phiêu lưu ký (1 mirror)"));
    assert!(text.contains("    Source: books/truyen-kieu.md"));
}

#[test]
fn gen_config_prints_stock_config() {
    let tmp = TempDir::new().unwrap();
    let out = ssgepub(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let parsed: toml::Value = toml::from_str(&stdout(&out)).unwrap();
    assert_eq!(parsed["catalog"]["page_size"].as_integer(), Some(12));
}

// =========================================================================
// Client commands
// =========================================================================

#[test]
fn search_finds_books_in_built_index() {
    let tmp = content(12);
    assert!(ssgepub(tmp.path(), &["build"]).status.success());

    let out = ssgepub(tmp.path(), &["search", "kiều"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.starts_with("001 Truyện Kiều"), "stdout: {text}");
    assert!(text.contains("/books/truyen-kieu/"));
}

#[test]
fn search_without_built_site_fails() {
    let tmp = content(12);
    let out = ssgepub(tmp.path(), &["search", "kiều"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("search index could not be loaded"));
}

#[test]
fn resolve_download_without_service_picks_first_mirror() {
    let tmp = content(12);
    let out = ssgepub(tmp.path(), &["resolve-download", "truyen-kieu"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Truyện Kiều \u{2192} drive"));
    assert!(text.contains("https://drive.example/book.epub"));
}

#[test]
fn resolve_download_uses_cached_session_index() {
    let tmp = content(12);
    let session = tmp.path().join(".ssgepub-temp");
    fs::create_dir_all(&session).unwrap();
    fs::write(
        session.join("session.json"),
        r#"{"ssgepub_platform_index": "5"}"#,
    )
    .unwrap();

    let out = ssgepub(tmp.path(), &["resolve-download", "truyen-kieu"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("https://mega.example/book.epub"));
}

#[test]
fn resolve_download_unknown_slug_fails() {
    let tmp = content(12);
    let out = ssgepub(tmp.path(), &["resolve-download", "khong-co"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no book with slug"));
}
