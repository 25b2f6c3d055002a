//! Manual accept/reject review of candidate publications.

use tracing::warn;

use super::{ExplorerError, Prompter, UrlOpener};
use crate::models::{Library, Publication};
use crate::ui;

/// Prompt shown for every review decision
pub const REVIEW_PROMPT: &str = "Response (y/n/p/i/e)";

/// A reviewer's answer for one publication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewResponse {
    Accept,
    Reject,
    ViewPdf,
    ViewInfo,
    Exit,
}

impl ReviewResponse {
    /// Interpret raw input. Anything unrecognized rejects the publication.
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "y" | "yes" => ReviewResponse::Accept,
            "p" => ReviewResponse::ViewPdf,
            "i" => ReviewResponse::ViewInfo,
            "e" => ReviewResponse::Exit,
            _ => ReviewResponse::Reject,
        }
    }
}

/// Walk through `candidates` in key order and return the accepted ones.
///
/// Accepted publications are keyed by acceptance order. Viewing the PDF or
/// info page re-prompts for the same publication; exiting returns what was
/// accepted so far.
pub fn review_publications<P, O>(
    candidates: &Library,
    prompter: &mut P,
    opener: &mut O,
) -> Result<Library, ExplorerError>
where
    P: Prompter + ?Sized,
    O: UrlOpener + ?Sized,
{
    let total = candidates.len();
    let mut selected = Library::new();

    for (position, publication) in candidates.publications().enumerate() {
        prompter.clear();
        prompter.show(&ui::review_card(position, total, publication));

        match decide(publication, prompter, opener)? {
            ReviewResponse::Accept => selected.push(publication.clone()),
            ReviewResponse::Exit => return Ok(selected),
            _ => {}
        }
    }

    Ok(selected)
}

/// Prompt until the answer is accept, reject or exit
fn decide<P, O>(
    publication: &Publication,
    prompter: &mut P,
    opener: &mut O,
) -> Result<ReviewResponse, ExplorerError>
where
    P: Prompter + ?Sized,
    O: UrlOpener + ?Sized,
{
    loop {
        let answer = prompter.ask(REVIEW_PROMPT).map_err(ExplorerError::Input)?;
        let url = match ReviewResponse::parse(&answer) {
            ReviewResponse::ViewPdf => &publication.paper_link,
            ReviewResponse::ViewInfo => &publication.paper_info_link,
            decision => return Ok(decision),
        };

        if let Err(e) = opener.open(url) {
            warn!(%url, error = %e, "could not open URL");
        }
    }
}
