//! Command-line arguments and the optional JSON URL file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use gbdb_core::ProcessOptions;
use serde::Deserialize;

use crate::{error::ConfigError, fetch::RetryPolicy};

pub const DEFAULT_URLS: [&str; 2] = [
    "https://myrient.erista.me/files/No-Intro/Nintendo%20-%20Game%20Boy/",
    "https://myrient.erista.me/files/No-Intro/Nintendo%20-%20Game%20Boy%20Color/",
];

pub const PRIVATE_URLS: [&str; 2] = [
    "https://myrient.erista.me/files/No-Intro/Nintendo%20-%20Game%20Boy%20(Private)/",
    "https://myrient.erista.me/files/No-Intro/Nintendo%20-%20Game%20Boy%20Color%20(Private)/",
];

/// Per-request timeout for listings and archives.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Game Boy ROM header catalog builder
#[derive(Parser, Debug)]
#[command(name = "gbdb", version)]
#[command(about = "Build and search a Game Boy ROM header catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download archives and write the catalog
    Build(BuildArgs),
    /// Look up titles in an existing catalog
    Search(SearchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Output JSON file
    #[arg(short, long, default_value = "rom-list.json")]
    pub output: PathBuf,

    /// Number of concurrent download threads
    #[arg(short, long, default_value_t = 8)]
    pub threads: usize,

    /// Skip header and global checksum verification
    #[arg(long)]
    pub no_checksums: bool,

    /// Calculate MD5 hashes for each ROM
    #[arg(long)]
    pub calculate_md5: bool,

    /// Process every ROM in multi-ROM archives, not just the first one
    #[arg(long)]
    pub process_all_roms: bool,

    /// Include BIOS files
    #[arg(long)]
    pub include_bios: bool,

    /// Skip the private collections
    #[arg(long)]
    pub no_private: bool,

    /// Retries per archive download
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// JSON file with a `urls` array replacing the built-in listing URLs
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Title to look for
    pub query: String,

    /// Catalog written by `gbdb build`
    #[arg(long, default_value = "rom-list.json")]
    pub catalog: PathBuf,

    /// Maximum number of results
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Deserialize, Debug)]
struct FileConfig {
    urls: Option<Vec<String>>,
}

/// Everything a harvest run needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub urls: Vec<String>,
    pub workers: usize,
    pub process: ProcessOptions,
    pub keep_all_images: bool,
    pub skip_bios: bool,
    pub retry: RetryPolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_URLS.iter().map(|url| (*url).to_owned()).collect(),
            workers: 8,
            process: ProcessOptions::default(),
            keep_all_images: false,
            skip_bios: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl BuildArgs {
    pub fn harvest_config(&self) -> Result<HarvestConfig, ConfigError> {
        let urls = match &self.config {
            Some(path) => load_urls(path)?,
            None => default_urls(!self.no_private),
        };

        Ok(HarvestConfig {
            urls,
            workers: self.threads.max(1),
            process: ProcessOptions {
                compute_checksums: !self.no_checksums,
                compute_content_hash: self.calculate_md5,
            },
            keep_all_images: self.process_all_roms,
            skip_bios: !self.include_bios,
            retry: RetryPolicy {
                retries: self.retries,
                ..RetryPolicy::default()
            },
        })
    }
}

pub fn default_urls(include_private: bool) -> Vec<String> {
    let private: &[&str] = if include_private { &PRIVATE_URLS } else { &[] };
    DEFAULT_URLS
        .iter()
        .chain(private)
        .map(|url| (*url).to_owned())
        .collect()
}

/// Read the `urls` array from a JSON config file.
pub fn load_urls(path: &Path) -> Result<Vec<String>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FileConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    config
        .urls
        .ok_or_else(|| ConfigError::MissingUrls(path.to_path_buf()))
}
