//! Publication model representing one scraped proceedings paper.

use serde::{Deserialize, Serialize};

/// A single publication as stored in a library or selection manifest.
///
/// Field names are part of the on-disk format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Paper title, taken verbatim from the index listing
    pub paper_title: String,

    /// Absolute URL of the paper's detail page
    pub paper_info_link: String,

    /// Absolute URL of the paper's PDF
    pub paper_link: String,

    /// Abstract text from the detail page
    pub paper_abstract: String,
}

impl Publication {
    /// Create a new publication from its four fields
    pub fn new(
        title: impl Into<String>,
        info_link: impl Into<String>,
        pdf_link: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            paper_title: title.into(),
            paper_info_link: info_link.into(),
            paper_link: pdf_link.into(),
            paper_abstract: abstract_text.into(),
        }
    }

    /// Case-insensitive substring match against the title or the abstract.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn mentions(&self, needle_lower: &str) -> bool {
        self.paper_title.to_lowercase().contains(needle_lower)
            || self.paper_abstract.to_lowercase().contains(needle_lower)
    }
}
