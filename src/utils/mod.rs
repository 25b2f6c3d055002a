//! Utility modules supporting the Compiler and the Explorer.
//!
//! - [`HttpClient`]: shared reqwest client carrying the configured user agent
//! - [`html`]: small HTML query layer over `scraper` plus URL resolution
//! - [`download_pdf`] / [`download_all`]: streaming PDF downloads
//! - [`init_tracing`]: logging setup shared by both binaries

mod download;
pub mod html;
mod http;

pub use download::{
    download_all, download_pdf, file_name_from_url, DownloadError, DownloadReport, DownloadedFile,
};
pub use http::HttpClient;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `verbose` counts `-v` flags; `quiet` limits output to errors. `RUST_LOG`
/// overrides both.
pub fn init_tracing(verbose: u8, quiet: bool) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_directives(verbose, quiet)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Filter covering the library and both binaries' targets
fn default_directives(verbose: u8, quiet: bool) -> String {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let level = if quiet { "error" } else { log_level };
    ["cvpr_explorer", "cvpr_compile"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_both_binaries() {
        assert_eq!(
            default_directives(1, false),
            "cvpr_explorer=info,cvpr_compile=info"
        );
        assert_eq!(
            default_directives(0, false),
            "cvpr_explorer=warn,cvpr_compile=warn"
        );
        assert_eq!(
            default_directives(5, false),
            "cvpr_explorer=trace,cvpr_compile=trace"
        );
        assert_eq!(
            default_directives(2, true),
            "cvpr_explorer=error,cvpr_compile=error"
        );
    }

    #[test]
    fn test_default_directives_parse() {
        assert!(tracing_subscriber::EnvFilter::try_new(default_directives(2, false)).is_ok());
    }
}
