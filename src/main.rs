use clap::{Parser, Subcommand};
use ssgepub::client::download::{HttpPlatformIndexService, NoService};
use ssgepub::client::search::{FileIndexSource, HttpIndexSource, IndexSource, SearchOptions};
use ssgepub::client::{DownloadResolver, FileStorage, LinkOpener, PlatformIndexService};
use ssgepub::client::{SearchClient, SearchState};
use ssgepub::{config, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("SSGEPUB_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("SSGEPUB_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "ssgepub")]
#[command(about = "Static site generator for ebook catalogs")]
#[command(long_about = "\
Static site generator for ebook catalogs

Every book is a markdown file with YAML frontmatter. The generated site is
an alphabetical, paginated catalog with a detail page per book, client-side
search, a light/dark theme and a download button.

Content structure:

  content/
  ├── config.toml              # Site config (optional)
  ├── books/                   # One file per book
  │   ├── so-do.md
  │   └── truyen-kieu.md
  ├── pages/                   # Standalone markdown pages (optional)
  │   └── gioi-thieu.md
  └── images/                  # Copied verbatim to the output root

Book frontmatter:

  ---
  title: Số đỏ                 # required
  author: Vũ Trọng Phụng       # required
  cover: /images/so-do.jpg     # required
  downloadLinks:               # required, at least one
    - url: https://example.com/so-do.epub
      platform: Drive
  description: ...             # optional
  tags: [văn học]              # optional
  publishDate: \"1936\"          # optional
  ---

A book that fails validation aborts the build.

Run 'ssgepub gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest, client session)
    #[arg(long, default_value = ".ssgepub-temp", global = true)]
    temp_dir: PathBuf,

    /// Log filter for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Search the index of a built site
    Search {
        query: String,
        /// Fetch the index from a deployed site instead of the output directory
        #[arg(long)]
        url: Option<String>,
    },
    /// Pick the download mirror for a book through the preference service
    ResolveDownload { slug: String },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Build => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_check_output(&manifest);
            println!("==> Content is valid");
        }
        Command::Search { query, url } => {
            let config = config::load_config(&cli.source)?;
            let options = SearchOptions::from(&config.search);
            let hits = match url {
                Some(url) => run_search(HttpIndexSource::new(url)?, options, &query)?,
                None => {
                    let path = cli.output.join(&config.search.index_path);
                    run_search(FileIndexSource { path }, options, &query)?
                }
            };
            output::print_search_output(&hits);
        }
        Command::ResolveDownload { slug } => {
            let manifest = scan::scan(&cli.source)?;
            let book = manifest
                .books
                .iter()
                .find(|b| b.slug == slug)
                .ok_or_else(|| format!("no book with slug \"{slug}\""))?;

            std::fs::create_dir_all(&cli.temp_dir)?;
            let storage = FileStorage::open(&session_path(&cli.temp_dir));
            let api_url = manifest.config.download.api_url.trim();
            let link = if api_url.is_empty() {
                resolve_download(&storage, NoService, &book.download_links)
            } else {
                let service = HttpPlatformIndexService::new(api_url)?;
                resolve_download(&storage, service, &book.download_links)
            };
            output::print_download_output(book, link.as_ref());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays the command's inventory.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)
}

/// Session storage of the download client, kept across CLI invocations.
fn session_path(temp_dir: &Path) -> PathBuf {
    temp_dir.join("session.json")
}

fn run_search<S: IndexSource>(
    source: S,
    options: SearchOptions,
    query: &str,
) -> Result<Vec<ssgepub::client::search::SearchHit>, String> {
    let mut client = SearchClient::new(source, options);
    if client.init() == SearchState::Degraded {
        return Err("search index could not be loaded".to_string());
    }
    Ok(client.search(query))
}

fn resolve_download<P: PlatformIndexService>(
    storage: &FileStorage,
    service: P,
    links: &[ssgepub::types::DownloadLink],
) -> Option<ssgepub::types::DownloadLink> {
    let resolver = DownloadResolver::new(storage, service, TerminalOpener);
    resolver.handle_click(links).cloned()
}

/// Reports navigation on the terminal instead of opening a browser.
struct TerminalOpener;

impl LinkOpener for TerminalOpener {
    fn open(&self, url: &str) {
        tracing::info!(%url, "opening download link");
    }

    fn set_loading(&self, loading: bool) {
        if loading {
            println!("==> Asking preference service");
        }
    }
}
