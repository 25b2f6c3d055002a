//! Library Compiler: scrape one proceedings year into a [`Library`].
//!
//! Compilation happens in two phases:
//!
//! 1. [`resolve_listing`] fetches the year's index page and works out whether
//!    it lists every publication directly, links to an "all papers" page, or
//!    splits publications into per-day pages. The result is the ordered list of
//!    [`ListingEntry`] title elements.
//! 2. [`scrape_listing`] visits each entry's detail page via
//!    [`scrape_publication`]; [`compile_library`] runs both phases. Every
//!    item produces its own `Result`; failures
//!    are collected into the [`CompileReport`] and never stop the batch.
//!
//! All page access goes through the [`PageFetcher`] trait so the algorithm can
//! be driven by [`MockFetcher`] in tests.

mod detail;
mod index;
pub mod mock;

pub use detail::{parse_detail_page, scrape_publication, DetailFields};
pub use index::{parse_index_layout, parse_listing, resolve_listing, IndexLayout, ListingEntry};
pub use mock::MockFetcher;

use async_trait::async_trait;
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

use crate::config::CompileConfig;
use crate::models::Library;

/// Source of HTML pages for the compiler
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body as text.
    ///
    /// Non-success HTTP statuses are errors.
    async fn fetch_page(&self, url: &Url) -> Result<String, CompileError>;
}

/// Errors raised while compiling a library
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A link could not be resolved to an absolute URL
    #[error("Invalid URL '{href}': {source}")]
    InvalidUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },

    /// Expected markup was not present on the page
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub(crate) fn invalid_url(href: impl Into<String>, source: url::ParseError) -> Self {
        CompileError::InvalidUrl {
            href: href.into(),
            source,
        }
    }
}

/// A publication that could not be scraped
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the entry in the resolved listing
    pub index: usize,

    /// Title, when the listing entry carried one
    pub title: Option<String>,

    pub error: CompileError,
}

/// Outcome of a compile run
#[derive(Debug)]
pub struct CompileReport {
    /// Number of listing entries found on the index
    pub found: usize,

    /// Successfully scraped publications keyed by listing position
    pub library: Library,

    /// Entries that were skipped
    pub failures: Vec<ItemFailure>,
}

/// Resolve the listing for `config.year` and scrape every entry.
///
/// Only failures to obtain the listing itself are returned as `Err`.
pub async fn compile_library<F>(
    fetcher: &F,
    config: &CompileConfig,
    progress: &ProgressBar,
) -> Result<CompileReport, CompileError>
where
    F: PageFetcher + ?Sized,
{
    let entries = resolve_listing(fetcher, config).await?;
    Ok(scrape_listing(fetcher, config, &entries, progress).await)
}

/// Scrape the detail page of every resolved listing entry.
///
/// Each entry is followed by `config.delay`, whether it succeeded or not.
pub async fn scrape_listing<F>(
    fetcher: &F,
    config: &CompileConfig,
    entries: &[ListingEntry],
    progress: &ProgressBar,
) -> CompileReport
where
    F: PageFetcher + ?Sized,
{
    info!(year = config.year, count = entries.len(), "publications found");
    progress.set_length(entries.len() as u64);

    let mut library = Library::new();
    let mut failures = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match scrape_publication(fetcher, &config.base_url, entry).await {
            Ok(publication) => library.insert(index, publication),
            Err(error) => {
                progress.suspend(|| {
                    warn!(index, title = ?entry.title, %error, "skipping publication")
                });
                failures.push(ItemFailure {
                    index,
                    title: entry.title.clone(),
                    error,
                });
            }
        }

        progress.inc(1);
        tokio::time::sleep(config.delay).await;
    }

    progress.finish();

    CompileReport {
        found: entries.len(),
        library,
        failures,
    }
}

/// Write a compiled library to `<libraries_dir>/cvpr<year>.json`
pub fn save_library(library: &Library, config: &CompileConfig) -> Result<PathBuf, CompileError> {
    std::fs::create_dir_all(&config.libraries_dir)?;

    let path = config.library_path();
    library.save(&path)?;
    info!(path = %path.display(), entries = library.len(), "library written");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    fn test_config(libraries_dir: PathBuf) -> CompileConfig {
        let mut config = CompileConfig::new(2020, &Config::default()).unwrap();
        config.delay = Duration::ZERO;
        config.libraries_dir = libraries_dir;
        config
    }

    fn detail(abstract_text: &str, pdf: &str) -> String {
        format!(
            r#"<html><body><div id="abstract">{}</div><a href="{}">pdf</a></body></html>"#,
            abstract_text, pdf
        )
    }

    #[tokio::test]
    async fn test_failed_items_leave_gaps() {
        let index = r#"<html><body><dl>
            <dt class="ptitle"><a href="/html/a.html">A</a></dt>
            <dt class="ptitle"><a href="/html/b.html">B</a></dt>
            <dt class="ptitle"><a href="/html/c.html">C</a></dt>
        </dl></body></html>"#;

        let fetcher = MockFetcher::new()
            .with_page("https://openaccess.thecvf.com/CVPR2020", index)
            .with_page(
                "https://openaccess.thecvf.com/html/a.html",
                &detail("first", "/papers/a.pdf"),
            )
            .with_page(
                "https://openaccess.thecvf.com/html/b.html",
                "<html><body>no abstract here</body></html>",
            )
            .with_page(
                "https://openaccess.thecvf.com/html/c.html",
                &detail("third", "/papers/c.pdf"),
            );

        let config = test_config(PathBuf::from("unused"));
        let report = compile_library(&fetcher, &config, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(report.found, 3);
        assert_eq!(report.library.keys().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].title.as_deref(), Some("B"));

        let third = report.library.get(2).unwrap();
        assert_eq!(third.paper_title, "C");
        assert_eq!(third.paper_abstract, "third");
        assert_eq!(
            third.paper_link,
            "https://openaccess.thecvf.com/papers/c.pdf"
        );
    }

    #[tokio::test]
    async fn test_every_item_failing_still_completes() {
        let index = r#"<dl>
            <dt class="ptitle"><a href="/html/gone.html">Gone</a></dt>
            <dt class="ptitle">no link at all</dt>
        </dl>"#;
        let fetcher = MockFetcher::new().with_page("https://openaccess.thecvf.com/CVPR2020", index);

        let config = test_config(PathBuf::from("unused"));
        let report = compile_library(&fetcher, &config, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(report.found, 2);
        assert!(report.library.is_empty());
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(
            report.failures[1].error,
            CompileError::MissingElement(_)
        ));
    }

    #[tokio::test]
    async fn test_scrape_listing_fetches_only_detail_pages() {
        let fetcher = MockFetcher::new().with_page(
            "https://openaccess.thecvf.com/html/a.html",
            &detail("first", "/papers/a.pdf"),
        );
        let entries = vec![
            ListingEntry {
                title: Some("A".to_string()),
                href: Some("/html/a.html".to_string()),
            },
            ListingEntry::default(),
        ];

        let config = test_config(PathBuf::from("unused"));
        let report = scrape_listing(&fetcher, &config, &entries, &ProgressBar::hidden()).await;

        assert_eq!(report.found, 2);
        assert_eq!(report.library.keys().collect::<Vec<_>>(), vec![0]);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(
            fetcher.requests(),
            vec!["https://openaccess.thecvf.com/html/a.html"]
        );
    }

    #[tokio::test]
    async fn test_missing_index_is_fatal() {
        let fetcher = MockFetcher::new();
        let config = test_config(PathBuf::from("unused"));

        let result = compile_library(&fetcher, &config, &ProgressBar::hidden()).await;
        assert!(matches!(result, Err(CompileError::Status { status: 404, .. })));
    }

    #[test]
    fn test_save_library_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().join("libraries"));

        let mut library = Library::new();
        library.insert(
            0,
            crate::models::Publication::new("T", "https://a/i", "https://a/p.pdf", "A"),
        );

        let path = save_library(&library, &config).unwrap();
        assert_eq!(path, dir.path().join("libraries").join("cvpr2020.json"));
        assert_eq!(Library::load(&path).unwrap(), library);
    }
}
