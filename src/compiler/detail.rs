//! Publication detail-page scraping.

use url::Url;

use super::{CompileError, ListingEntry, PageFetcher};
use crate::models::Publication;
use crate::utils::html::{resolve_url, HtmlPage};

/// Visible text of the anchor that links to the PDF
const PDF_ANCHOR_TEXT: &str = "pdf";

/// Fields taken from a detail page
///
/// `abstract_text` is the container's full text with surrounding whitespace
/// trimmed, not the raw first text node, so it carries no leading newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub abstract_text: String,
    pub pdf_url: Url,
}

/// Extract the abstract and absolute PDF link from a detail page
pub fn parse_detail_page(html: &str, base_url: &Url) -> Result<DetailFields, CompileError> {
    let page = HtmlPage::parse(html);

    let abstract_text = page
        .find_first("div", |node| node.id() == Some("abstract"))
        .map(|node| node.text().trim().to_string())
        .ok_or_else(|| CompileError::MissingElement("abstract container".to_string()))?;

    let href = page
        .find_first("a", |node| node.text().trim() == PDF_ANCHOR_TEXT)
        .ok_or_else(|| CompileError::MissingElement("pdf link".to_string()))?
        .attr("href")
        .ok_or_else(|| CompileError::MissingElement("href on pdf link".to_string()))?;

    let pdf_url = resolve_url(base_url, href).map_err(|e| CompileError::invalid_url(href, e))?;

    Ok(DetailFields {
        abstract_text,
        pdf_url,
    })
}

/// Scrape one listing entry into a [`Publication`].
///
/// Any problem with this entry is returned as an error for the caller to
/// record; nothing here aborts the surrounding batch.
pub async fn scrape_publication<F>(
    fetcher: &F,
    base_url: &Url,
    entry: &ListingEntry,
) -> Result<Publication, CompileError>
where
    F: PageFetcher + ?Sized,
{
    let title = entry
        .title
        .as_deref()
        .ok_or_else(|| CompileError::MissingElement("title link".to_string()))?;
    let href = entry
        .href
        .as_deref()
        .ok_or_else(|| CompileError::MissingElement("href on title link".to_string()))?;

    let info_url = resolve_url(base_url, href).map_err(|e| CompileError::invalid_url(href, e))?;

    let html = fetcher.fetch_page(&info_url).await?;
    let detail = parse_detail_page(&html, base_url)?;

    Ok(Publication::new(
        title,
        info_url.as_str(),
        detail.pdf_url.as_str(),
        detail.abstract_text,
    ))
}
