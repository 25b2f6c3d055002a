use anyhow::{Context, Result};
use clap::Parser;
use cvpr_explorer::config::{find_config_file, load_config};
use cvpr_explorer::explorer::{
    run_session, write_manifest, LibraryStore, SessionOutcome, SystemBrowser, TerminalPrompter,
};
use cvpr_explorer::ui::{self, Status};
use cvpr_explorer::utils::{download_all, init_tracing, HttpClient};
use cvpr_explorer::{eprint_status, print_status};
use std::path::PathBuf;

/// Filter compiled CVPR libraries and download the selected papers
#[derive(Parser, Debug)]
#[command(name = "cvpr-explorer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Interactively filter CVPR libraries and download the selected PDFs",
    long_about = None
)]
struct Cli {
    /// Directory holding compiled libraries [default: ./libraries]
    #[arg(long)]
    libraries: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref())?;
    if let Some(libraries) = cli.libraries {
        config.storage.libraries_dir = libraries;
    }

    let store = LibraryStore::new(&config.storage.libraries_dir);
    let outcome = run_session(&store, &mut TerminalPrompter::new(), &mut SystemBrowser);

    let (destination, manifest) = match outcome {
        Ok(SessionOutcome::Selected {
            destination,
            manifest,
        }) => (destination, manifest),
        Ok(SessionOutcome::NothingFound) => {
            print_status!(Status::Warning, "No publications found. Exiting...");
            return Ok(());
        }
        Err(e) => {
            eprint_status!(Status::Error, "{}. Exiting...", e);
            std::process::exit(1);
        }
    };

    let manifest_path = write_manifest(&destination, &config.storage.manifest_file, &manifest)
        .with_context(|| format!("Failed to write manifest to {}", destination.display()))?;
    print_status!(
        Status::Info,
        "{} publications saved to {}",
        manifest.len(),
        manifest_path.display()
    );

    let client = HttpClient::with_user_agent(&config.site.user_agent)
        .context("Failed to create HTTP client")?;

    print_status!(Status::Download, "Downloading PDFs...");
    let progress = ui::progress_bar(manifest.len() as u64, "Downloading");
    let report = download_all(&client, &manifest, &destination, &progress).await;

    for (url, error) in &report.failures {
        eprint_status!(Status::Error, "Failed to download from {}", url);
        eprint_status!(
            Status::Error,
            "Details: {}",
            ui::truncate_with_ellipsis(&error.to_string(), 300)
        );
    }

    print_status!(
        Status::Success,
        "Done! {} of {} PDFs downloaded ({})",
        report.succeeded(),
        report.attempted,
        ui::format_file_size(report.total_bytes())
    );

    Ok(())
}
