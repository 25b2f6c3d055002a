use anyhow::{Context, Result};
use clap::Parser;
use cvpr_explorer::compiler::{resolve_listing, save_library, scrape_listing};
use cvpr_explorer::config::{find_config_file, load_config, CompileConfig};
use cvpr_explorer::ui::{self, Status};
use cvpr_explorer::utils::{init_tracing, HttpClient};
use cvpr_explorer::{eprint_status, print_status};
use std::path::PathBuf;

/// Compile one year of CVPR open-access proceedings into a JSON library
#[derive(Parser, Debug)]
#[command(name = "cvpr-compile")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Compile one year of CVPR proceedings into ./libraries/cvpr<year>.json",
    long_about = None
)]
struct Cli {
    /// CVPR year to compile into a library
    year: u32,

    /// Delay between publication requests, in seconds [default: 0.25]
    #[arg(long, short)]
    delay: Option<f64>,

    /// User-agent string for publication requests [default: CVPR-Explorer]
    #[arg(long, short)]
    useragent: Option<String>,

    /// Root URL of the proceedings site
    #[arg(long)]
    base_url: Option<String>,

    /// Directory the library is written to [default: ./libraries]
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
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(config_path.as_deref())?;

    if let Some(delay) = cli.delay {
        config.site.request_delay_secs = delay;
    }
    if let Some(user_agent) = cli.useragent {
        config.site.user_agent = user_agent;
    }
    if let Some(base_url) = cli.base_url {
        config.site.base_url = base_url;
    }
    if let Some(libraries) = cli.libraries {
        config.storage.libraries_dir = libraries;
    }

    let compile_config = CompileConfig::new(cli.year, &config)?;
    let client = HttpClient::with_user_agent(&compile_config.user_agent)
        .context("Failed to create HTTP client")?;

    print_status!(
        Status::Info,
        "Getting the publication list for CVPR {}",
        cli.year
    );

    let entries = match resolve_listing(&client, &compile_config).await {
        Ok(entries) => entries,
        Err(e) => {
            eprint_status!(Status::Error, "Failed to get the publication list: {}", e);
            std::process::exit(1);
        }
    };

    print_status!(Status::Info, "{} publications found.", entries.len());

    let progress = ui::progress_bar(entries.len() as u64, "Compiling library");
    let report = scrape_listing(&client, &compile_config, &entries, &progress).await;

    for failure in &report.failures {
        eprint_status!(
            Status::Warning,
            "Skipped #{} ({}): {}",
            failure.index,
            ui::truncate_with_ellipsis(failure.title.as_deref().unwrap_or("untitled"), 60),
            failure.error
        );
    }

    print_status!(Status::Info, "Writing library...");
    let path = save_library(&report.library, &compile_config)
        .with_context(|| format!("Failed to write library for CVPR {}", cli.year))?;

    print_status!(
        Status::Success,
        "Done! {} of {} publications written to {}",
        report.library.len(),
        report.found,
        path.display()
    );

    Ok(())
}
