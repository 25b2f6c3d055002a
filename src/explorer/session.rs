//! The interactive Explorer session.

use std::path::{Path, PathBuf};
use tracing::info;

use super::{
    filter_publications, parse_keywords, parse_selection, review_publications, ExplorerError,
    LibraryStore, Prompter, UrlOpener,
};
use crate::models::Library;
use crate::ui::{self, Status};

/// Result of the interactive part of an Explorer run
#[derive(Debug)]
pub enum SessionOutcome {
    /// No publication survived keyword filtering; nothing should be written
    NothingFound,

    /// The final selection and the folder it belongs in
    Selected {
        destination: PathBuf,
        manifest: Library,
    },
}

/// Ask the user for a destination, keywords, libraries and review mode, then
/// build the selection.
///
/// Nothing is written to disk here. Fatal input problems (no libraries, bad
/// library selection, closed input) are returned as errors.
pub fn run_session<P, O>(
    store: &LibraryStore,
    prompter: &mut P,
    opener: &mut O,
) -> Result<SessionOutcome, ExplorerError>
where
    P: Prompter + ?Sized,
    O: UrlOpener + ?Sized,
{
    let names = store.list()?;

    prompter.show(&ui::notice(
        "Please pick a folder name in which selected publications will be stored.",
    ));
    let mut folder = ask(prompter, "Folder Name")?;
    while folder.trim().is_empty() {
        folder = ask(prompter, "Please enter a valid folder name")?;
    }
    let destination = PathBuf::from(folder.trim());

    prompter.show(&ui::notice(
        "Please enter keywords or phrases (separated by a comma) that you wish to filter \
         publications by.\nPress enter if you do not wish to filter any publications.",
    ));
    let keywords = parse_keywords(&ask(prompter, "Filter")?);

    prompter.show(&ui::notice(
        "Please select the libraries you wish to search. To select a library, type the number \
         beside it.\nTo select multiple libraries, separate the numbers with commas.",
    ));
    prompter.show(&ui::library_listing(&names));
    let indices = parse_selection(&ask(prompter, "Selected")?, names.len())?;

    let libraries = store.load_selected(&names, &indices)?;
    let candidates = filter_publications(&libraries, &keywords);
    info!(
        libraries = libraries.len(),
        keywords = keywords.len(),
        candidates = candidates.len(),
        "libraries filtered"
    );

    if candidates.is_empty() {
        return Ok(SessionOutcome::NothingFound);
    }

    prompter.show(&ui::status_line(
        Status::Info,
        &format!("{} publications selected.", candidates.len()),
    ));
    prompter.show(&ui::notice(
        "Would you like to manually filter the selected publications?\nIf not, all \
         publication PDFs will be downloaded from the list.",
    ));
    let manual = matches!(ask(prompter, "Response (y/n)")?.trim(), "y" | "yes");

    let manifest = if manual {
        review_publications(&candidates, prompter, opener)?
    } else {
        candidates
    };

    Ok(SessionOutcome::Selected {
        destination,
        manifest,
    })
}

/// Write `manifest` as `<destination>/<file_name>`, creating the folder if needed
pub fn write_manifest(
    destination: &Path,
    file_name: &str,
    manifest: &Library,
) -> Result<PathBuf, ExplorerError> {
    std::fs::create_dir_all(destination)?;

    let path = destination.join(file_name);
    manifest.save(&path)?;
    info!(path = %path.display(), entries = manifest.len(), "manifest written");

    Ok(path)
}

fn ask<P: Prompter + ?Sized>(prompter: &mut P, prompt: &str) -> Result<String, ExplorerError> {
    prompter.ask(prompt).map_err(ExplorerError::Input)
}
