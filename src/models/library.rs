//! Library and selection manifest: ordered, integer-keyed publication maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::Publication;

/// Indentation used for every JSON file this crate writes.
const JSON_INDENT: &[u8] = b"    ";

/// An ordered mapping from integer keys to publications.
///
/// Serialized as a JSON object whose keys are the stringified integers
/// (`{"0": {...}, "1": {...}}`). Keys iterate in numeric order. A compiled
/// library may have gaps where items failed to scrape; a selection manifest
/// is always built with [`Library::renumbered`] and so has keys `0..n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    entries: BTreeMap<usize, Publication>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library keyed `0..n` from publications in iteration order.
    pub fn renumbered<I>(publications: I) -> Self
    where
        I: IntoIterator<Item = Publication>,
    {
        Self {
            entries: publications.into_iter().enumerate().collect(),
        }
    }

    /// Insert a publication under an explicit key
    pub fn insert(&mut self, key: usize, publication: Publication) {
        self.entries.insert(key, publication);
    }

    /// Append a publication under the next contiguous key
    pub fn push(&mut self, publication: Publication) {
        let key = self.entries.len();
        self.entries.insert(key, publication);
    }

    pub fn get(&self, key: usize) -> Option<&Publication> {
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in numeric order
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Publications in key order
    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.entries.values()
    }

    /// Serialize as pretty-printed JSON with a four-space indent
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a library file from disk
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Write the library to disk, replacing any existing file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)
    }
}

impl IntoIterator for Library {
    type Item = (usize, Publication);
    type IntoIter = std::collections::btree_map::IntoIter<usize, Publication>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication(title: &str) -> Publication {
        Publication::new(
            title,
            format!("https://example.com/{}.html", title),
            format!("https://example.com/{}.pdf", title),
            "abstract",
        )
    }

    #[test]
    fn test_json_layout() {
        let mut library = Library::new();
        library.insert(0, publication("a"));

        let expected = concat!(
            "{\n",
            "    \"0\": {\n",
            "        \"paper_title\": \"a\",\n",
            "        \"paper_info_link\": \"https://example.com/a.html\",\n",
            "        \"paper_link\": \"https://example.com/a.pdf\",\n",
            "        \"paper_abstract\": \"abstract\"\n",
            "    }\n",
            "}"
        );
        assert_eq!(library.to_json_pretty().unwrap(), expected);
    }

    #[test]
    fn test_empty_library_json() {
        assert_eq!(Library::new().to_json_pretty().unwrap(), "{}");
    }

    #[test]
    fn test_keys_sort_numerically() {
        let json = r#"{
            "10": {"paper_title": "ten", "paper_info_link": "i", "paper_link": "p", "paper_abstract": "a"},
            "2": {"paper_title": "two", "paper_info_link": "i", "paper_link": "p", "paper_abstract": "a"}
        }"#;
        let library = Library::from_json(json).unwrap();

        assert_eq!(library.keys().collect::<Vec<_>>(), vec![2, 10]);
        assert_eq!(library.get(10).unwrap().paper_title, "ten");
    }

    #[test]
    fn test_renumbered_closes_gaps() {
        let mut sparse = Library::new();
        sparse.insert(3, publication("x"));
        sparse.insert(7, publication("y"));

        let manifest = Library::renumbered(sparse.into_iter().map(|(_, p)| p));
        assert_eq!(manifest.keys().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(manifest.get(1).unwrap().paper_title, "y");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cvpr2020.json");

        let mut library = Library::new();
        library.insert(0, publication("a"));
        library.insert(2, publication("c"));
        library.save(&path).unwrap();

        let loaded = Library::load(&path).unwrap();
        assert_eq!(loaded, library);
    }
}
