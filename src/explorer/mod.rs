//! Library Explorer: narrow compiled libraries down to a selection manifest.
//!
//! The pipeline is
//!
//! 1. [`LibraryStore`] lists and loads the chosen library files,
//! 2. [`filter_publications`] applies the optional keyword filter,
//! 3. [`review_publications`] optionally walks the user through each candidate,
//! 4. [`write_manifest`] persists the final selection.
//!
//! All console interaction goes through [`Prompter`] and [`UrlOpener`], so the
//! whole session can be scripted in tests with [`ScriptedPrompter`] and
//! [`RecordingOpener`].

mod filter;
mod prompt;
mod review;
mod session;
mod store;

pub use filter::{filter_publications, parse_keywords};
pub use prompt::{
    Prompter, RecordingOpener, ScriptedPrompter, SystemBrowser, TerminalPrompter, UrlOpener,
};
pub use review::{review_publications, ReviewResponse};
pub use session::{run_session, write_manifest, SessionOutcome};
pub use store::{parse_selection, LibraryStore};

use std::path::PathBuf;

/// Errors that end an Explorer run
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// The libraries directory does not exist
    #[error("Unable to detect the libraries folder at '{}'", .0.display())]
    MissingLibrariesDir(PathBuf),

    /// The libraries directory holds no library files
    #[error("Unable to detect any libraries in '{}'", .0.display())]
    NoLibraries(PathBuf),

    /// A library selection was not a number
    #[error("Library selection '{0}' is not a number")]
    InvalidSelection(String),

    /// A library selection does not match a listed library
    #[error("Library selection {index} is out of range (found {available} libraries)")]
    SelectionOutOfRange { index: usize, available: usize },

    /// A library file could not be read or parsed
    #[error("Failed to load library '{}': {source}", path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Console input ended or failed
    #[error("Input error: {0}")]
    Input(#[source] std::io::Error),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
