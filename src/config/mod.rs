//! Configuration management.
//!
//! Settings come from (lowest to highest precedence) built-in defaults, an
//! optional TOML file, environment variables prefixed `CVPR_EXPLORER`, and
//! finally command-line flags applied by the binaries.
//!
//! ```toml
//! [site]
//! base_url = "https://openaccess.thecvf.com"
//! user_agent = "CVPR-Explorer"
//! request_delay_secs = 0.25
//!
//! [storage]
//! libraries_dir = "./libraries"
//! manifest_file = "publications.json"
//! ```
//!
//! Environment variables use `__` between section and key, e.g.
//! `CVPR_EXPLORER_SITE__REQUEST_DELAY_SECS=1.0`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Name of the configuration file looked up by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "cvpr-explorer.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Proceedings site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Where libraries and manifests live
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Proceedings site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root of the open-access proceedings site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Courtesy delay after each page fetch, in seconds
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_delay_secs: default_request_delay(),
        }
    }
}

fn default_base_url() -> String {
    "https://openaccess.thecvf.com".to_string()
}

fn default_user_agent() -> String {
    "CVPR-Explorer".to_string()
}

fn default_request_delay() -> f64 {
    0.25
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding compiled library files
    #[serde(default = "default_libraries_dir")]
    pub libraries_dir: PathBuf,

    /// File name of the selection manifest written into the destination folder
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            libraries_dir: default_libraries_dir(),
            manifest_file: default_manifest_file(),
        }
    }
}

fn default_libraries_dir() -> PathBuf {
    PathBuf::from("./libraries")
}

fn default_manifest_file() -> String {
    "publications.json".to_string()
}

/// Load configuration from an optional file plus `CVPR_EXPLORER_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("CVPR_EXPLORER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Look for a config file in the working directory, then in the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("cvpr-explorer").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Parameters for one Compiler run, passed explicitly to the scraping routines
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Conference year to compile
    pub year: u32,

    /// Site root every relative link is resolved against
    pub base_url: Url,

    pub user_agent: String,

    /// Pause after every day-page and detail-page fetch
    pub delay: Duration,

    /// Output directory for `cvpr<year>.json`
    pub libraries_dir: PathBuf,
}

impl CompileConfig {
    pub fn new(year: u32, config: &Config) -> Result<Self, config::ConfigError> {
        let base_url = Url::parse(&config.site.base_url).map_err(|e| {
            config::ConfigError::Message(format!(
                "invalid base URL '{}': {}",
                config.site.base_url, e
            ))
        })?;

        let delay = Duration::try_from_secs_f64(config.site.request_delay_secs).map_err(|_| {
            config::ConfigError::Message(format!(
                "request delay must be a non-negative number of seconds, got {}",
                config.site.request_delay_secs
            ))
        })?;

        Ok(Self {
            year,
            base_url,
            user_agent: config.site.user_agent.clone(),
            delay,
            libraries_dir: config.storage.libraries_dir.clone(),
        })
    }

    /// Proceedings index page for the configured year
    pub fn index_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/CVPR{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.year
        ))
    }

    /// Where the compiled library is written
    pub fn library_path(&self) -> PathBuf {
        self.libraries_dir.join(format!("cvpr{}.json", self.year))
    }
}
