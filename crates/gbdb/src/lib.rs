//! Harvests Game Boy ROM headers from No-Intro archive mirrors.
//!
//! The flow is: [`listing::discover`] finds archives, [`harvest`] downloads
//! them on a worker pool, [`process_archive`] unpacks each one and runs
//! [`gbdb_core::process_image`] on its images, and [`catalog`] writes the
//! sorted result.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod pool;
pub mod progress;

use std::io;

use gbdb_core::{OutputRecord, process_image};
use tracing::{debug, warn};

use crate::{
    archive::extract_images,
    config::HarvestConfig,
    error::{ArchiveError, FetchError},
    fetch::{Source, fetch_with_retry},
    listing::ArchiveEntry,
    pool::{CancelToken, run_pool},
};

/// An image inside an archive whose header could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFailure {
    pub image: String,
    pub error: gbdb_core::Error,
}

/// What happened to one archive.
#[derive(Debug)]
pub enum ArchiveOutcome {
    /// At least one image was found. Images that failed to decode are listed
    /// in `failures` and have no record.
    Decoded {
        records: Vec<OutputRecord>,
        failures: Vec<ImageFailure>,
    },
    /// The archive opened but held no ROM image.
    NoImages,
    /// The archive could not be read.
    Corrupt(String),
    /// The download failed after all retries.
    FetchFailed(FetchError),
    /// Cancelled before the download finished.
    Cancelled,
}

/// Download one archive and decode its images.
pub fn process_archive(
    source: &dyn Source,
    entry: &ArchiveEntry,
    config: &HarvestConfig,
    cancel: &CancelToken,
) -> ArchiveOutcome {
    let bytes = match fetch_with_retry(source, &entry.url, &entry.filename, &config.retry, cancel)
    {
        Ok(bytes) => bytes,
        Err(FetchError::Cancelled) => return ArchiveOutcome::Cancelled,
        Err(err) => return ArchiveOutcome::FetchFailed(err),
    };

    let extraction = match extract_images(&bytes, config.keep_all_images) {
        Ok(extraction) => extraction,
        Err(ArchiveError::NoImages) => {
            warn!("No ROM files found in {}", entry.filename);
            return ArchiveOutcome::NoImages;
        }
        Err(ArchiveError::Corrupt(reason)) => {
            warn!("Bad ZIP file: {} ({reason})", entry.filename);
            return ArchiveOutcome::Corrupt(reason);
        }
    };
    if extraction.skipped > 0 {
        warn!(
            "Multiple ROM files found in {}, using only the first one",
            entry.filename
        );
    }

    let mut records = Vec::with_capacity(extraction.images.len());
    let mut failures = Vec::new();
    for image in extraction.images {
        match process_image(&entry.filename, &image.name, &image.bytes, &config.process) {
            Ok(record) => {
                if record.title_lossy {
                    debug!("Title of {} is not plain ASCII", image.name);
                }
                records.push(record);
            }
            Err(error) => {
                warn!("Skipping {} in {}: {error}", image.name, entry.filename);
                failures.push(ImageFailure {
                    image: image.name,
                    error,
                });
            }
        }
    }

    ArchiveOutcome::Decoded { records, failures }
}

/// Totals for a harvest run.
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// Records sorted by archive name, then image name.
    pub records: Vec<OutputRecord>,
    /// Archives whose outcome was delivered.
    pub archives: usize,
    pub empty_archives: usize,
    pub corrupt_archives: usize,
    pub failed_downloads: usize,
    pub image_failures: usize,
    /// The run was interrupted; `records` holds what finished before that.
    pub cancelled: bool,
}

/// Process `entries` on `config.workers` threads.
///
/// `observer` sees every outcome on the calling thread as it arrives.
pub fn harvest<F>(
    source: &dyn Source,
    entries: Vec<ArchiveEntry>,
    config: &HarvestConfig,
    cancel: &CancelToken,
    mut observer: F,
) -> io::Result<HarvestReport>
where
    F: FnMut(&ArchiveEntry, &ArchiveOutcome),
{
    let mut report = HarvestReport::default();

    run_pool(
        entries,
        config.workers,
        cancel,
        |entry| {
            let outcome = process_archive(source, &entry, config, cancel);
            (entry, outcome)
        },
        |(entry, outcome)| {
            observer(&entry, &outcome);
            report.archives += 1;
            match outcome {
                ArchiveOutcome::Decoded { records, failures } => {
                    report.image_failures += failures.len();
                    report.records.extend(records);
                }
                ArchiveOutcome::NoImages => report.empty_archives += 1,
                ArchiveOutcome::Corrupt(_) => report.corrupt_archives += 1,
                ArchiveOutcome::FetchFailed(_) => report.failed_downloads += 1,
                ArchiveOutcome::Cancelled => {}
            }
        },
    )?;

    report.cancelled = cancel.is_cancelled();
    catalog::sort_records(&mut report.records);
    Ok(report)
}
