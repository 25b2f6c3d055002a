//! Library files on disk.

use std::path::PathBuf;
use tracing::debug;

use super::ExplorerError;
use crate::models::Library;

/// The directory of compiled library files
#[derive(Debug, Clone)]
pub struct LibraryStore {
    dir: PathBuf,
}

impl LibraryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sorted file names of every library in the directory.
    ///
    /// A missing or empty directory is an error.
    pub fn list(&self) -> Result<Vec<String>, ExplorerError> {
        if !self.dir.is_dir() {
            return Err(ExplorerError::MissingLibrariesDir(self.dir.clone()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        if names.is_empty() {
            return Err(ExplorerError::NoLibraries(self.dir.clone()));
        }

        names.sort();
        Ok(names)
    }

    /// Load one library by file name
    pub fn load(&self, name: &str) -> Result<Library, ExplorerError> {
        let path = self.dir.join(name);
        debug!(path = %path.display(), "loading library");

        Library::load(&path).map_err(|source| ExplorerError::Library { path, source })
    }

    /// Load the libraries at `indices` of `names`, in the given order
    pub fn load_selected(
        &self,
        names: &[String],
        indices: &[usize],
    ) -> Result<Vec<Library>, ExplorerError> {
        indices
            .iter()
            .map(|&index| {
                let name = names.get(index).ok_or(ExplorerError::SelectionOutOfRange {
                    index,
                    available: names.len(),
                })?;
                self.load(name)
            })
            .collect()
    }
}

/// Parse comma-separated library indices.
///
/// Every piece, once trimmed, must be ASCII digits naming one of `available`
/// listed libraries.
pub fn parse_selection(input: &str, available: usize) -> Result<Vec<usize>, ExplorerError> {
    input
        .split(',')
        .map(str::trim)
        .map(|piece| {
            if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ExplorerError::InvalidSelection(piece.to_string()));
            }

            let index: usize = piece
                .parse()
                .map_err(|_| ExplorerError::InvalidSelection(piece.to_string()))?;
            if index >= available {
                return Err(ExplorerError::SelectionOutOfRange { index, available });
            }

            Ok(index)
        })
        .collect()
}
