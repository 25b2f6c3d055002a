//! Proceedings index resolution.

use tracing::{debug, info};
use url::Url;

use super::{CompileError, PageFetcher};
use crate::config::CompileConfig;
use crate::utils::html::{any, resolve_url, HtmlPage};

/// Text found in the first day-descriptor of a paginated index
const PAGINATED_MARKER: &str = "Day 1: ";

/// Token in a day link that marks the "all papers" page
const ALL_PAPERS_TOKEN: &str = "all";

/// How an index page exposes its publications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLayout {
    /// The index page itself lists every publication
    Flat,

    /// Paginated, with a single page listing every publication
    AllPapers(Url),

    /// Paginated by day; pages in the order they appear on the index
    Daily(Vec<Url>),
}

/// One `<dt class="ptitle">` title element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingEntry {
    /// Literal anchor text; `None` when the element has no anchor
    pub title: Option<String>,

    /// Anchor `href`, unresolved
    pub href: Option<String>,
}

/// Inspect an index page and decide how to collect its publications.
///
/// Day links are resolved against `base_url`.
pub fn parse_index_layout(html: &str, base_url: &Url) -> Result<IndexLayout, CompileError> {
    let page = HtmlPage::parse(html);
    let days = page.find_all("dd", any);

    let paginated = days
        .first()
        .is_some_and(|first| first.text().contains(PAGINATED_MARKER));
    if !paginated {
        return Ok(IndexLayout::Flat);
    }

    let mut day_pages = Vec::new();
    for day in &days {
        let Some(href) = day.find_first("a", any).and_then(|a| a.attr("href")) else {
            continue;
        };

        let url = resolve_url(base_url, href).map_err(|e| CompileError::invalid_url(href, e))?;
        if href.contains(ALL_PAPERS_TOKEN) {
            return Ok(IndexLayout::AllPapers(url));
        }
        day_pages.push(url);
    }

    Ok(IndexLayout::Daily(day_pages))
}

/// Extract every title element of a listing page, in document order
pub fn parse_listing(html: &str) -> Vec<ListingEntry> {
    let page = HtmlPage::parse(html);

    let entries = page
        .find_all("dt", |node| node.has_class("ptitle"))
        .into_iter()
        .map(|title| {
            let anchor = title.find_first("a", any);
            ListingEntry {
                title: anchor.map(|a| a.text()),
                href: anchor.and_then(|a| a.attr("href")).map(str::to_string),
            }
        })
        .collect();
    entries
}

/// Fetch the year's index and return the full, ordered publication listing.
///
/// Day pages are fetched one at a time with `config.delay` after each.
pub async fn resolve_listing<F>(
    fetcher: &F,
    config: &CompileConfig,
) -> Result<Vec<ListingEntry>, CompileError>
where
    F: PageFetcher + ?Sized,
{
    let index_url = config
        .index_url()
        .map_err(|e| CompileError::invalid_url(format!("CVPR{}", config.year), e))?;

    info!(url = %index_url, "fetching publication index");
    let index_html = fetcher.fetch_page(&index_url).await?;

    match parse_index_layout(&index_html, &config.base_url)? {
        IndexLayout::Flat => {
            debug!("index lists publications directly");
            Ok(parse_listing(&index_html))
        }
        IndexLayout::AllPapers(url) => {
            debug!(%url, "using all-papers page");
            let html = fetcher.fetch_page(&url).await?;
            Ok(parse_listing(&html))
        }
        IndexLayout::Daily(days) => {
            debug!(days = days.len(), "index is paginated by day");
            let mut entries = Vec::new();
            for url in &days {
                let html = fetcher.fetch_page(url).await?;
                let day_entries = parse_listing(&html);
                debug!(%url, count = day_entries.len(), "day page listed");
                entries.extend(day_entries);
                tokio::time::sleep(config.delay).await;
            }
            Ok(entries)
        }
    }
}
