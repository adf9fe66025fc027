use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    #[error("fetch cancelled")]
    Cancelled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// The container opened fine but holds no `.gb` / `.gbc` member.
    #[error("no ROM images in archive")]
    NoImages,

    /// The container could not be opened or a member could not be read.
    #[error("corrupt archive: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config {0} has no `urls` list")]
    MissingUrls(PathBuf),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}
