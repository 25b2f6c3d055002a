//! # CVPR Explorer
//!
//! Compile CVPR open-access proceedings into local JSON libraries, then filter,
//! review and bulk-download the papers you care about.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Publication, Library)
//! - [`compiler`]: Index pagination resolution and detail-page scraping
//! - [`explorer`]: Keyword filtering, manual review and the interactive session
//! - [`utils`]: HTTP client, HTML queries, PDF downloads and logging setup
//! - [`config`]: Configuration management
//! - [`ui`]: Colored console output and progress bars

pub mod compiler;
pub mod config;
pub mod explorer;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Library, Publication};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
