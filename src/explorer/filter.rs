//! Keyword filtering across libraries.

use crate::models::{Library, Publication};

/// Split comma-separated keyword input; blank pieces are dropped
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flatten `libraries` into one manifest-shaped library keyed `0..n`.
///
/// With keywords, a publication is kept when any keyword occurs
/// case-insensitively in its title or abstract. Each publication appears at
/// most once. Order is library order, then key order within a library.
pub fn filter_publications(libraries: &[Library], keywords: &[String]) -> Library {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let matches = |publication: &Publication| {
        needles.is_empty() || needles.iter().any(|needle| publication.mentions(needle))
    };

    Library::renumbered(
        libraries
            .iter()
            .flat_map(|library| library.publications())
            .filter(|publication| matches(publication))
            .cloned(),
    )
}
