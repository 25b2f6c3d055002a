//! Core data models for publications, libraries and selection manifests.

mod library;
mod publication;

pub use library::Library;
pub use publication::Publication;
