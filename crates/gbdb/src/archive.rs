//! ROM extraction from zip containers.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::ArchiveError;

/// Image extensions picked out of an archive (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 2] = [".gb", ".gbc"];

/// Members larger than this are treated as a corrupt archive.
pub const MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

/// One ROM image read out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Member name inside the archive.
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Images in archive order.
    pub images: Vec<ExtractedImage>,
    /// Image members present but not read because only the first was wanted.
    pub skipped: usize,
}

pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Read the ROM images out of a zip archive held in memory.
///
/// With `keep_all` unset only the first image is read and the rest are
/// counted in [`Extraction::skipped`].
pub fn extract_images(archive: &[u8], keep_all: bool) -> Result<Extraction, ArchiveError> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(corrupt)?;

    let mut images = Vec::new();
    let mut skipped = 0;
    for idx in 0..zip.len() {
        // Only image members are opened; other members may use a method we cannot decode.
        let Some(name) = zip.name_for_index(idx).filter(|name| is_image_name(name)) else {
            continue;
        };
        if !keep_all && !images.is_empty() {
            skipped += 1;
            continue;
        }

        let name = name.to_owned();
        let member = zip.by_index(idx).map_err(corrupt)?;
        let size = member.size();
        if size > MAX_IMAGE_BYTES {
            return Err(ArchiveError::Corrupt(format!(
                "{name} is {size} bytes, limit is {MAX_IMAGE_BYTES}"
            )));
        }

        let mut bytes = Vec::with_capacity(size as usize);
        member
            .take(MAX_IMAGE_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|err| ArchiveError::Corrupt(format!("{name}: {err}")))?;
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(ArchiveError::Corrupt(format!(
                "{name} exceeds {MAX_IMAGE_BYTES} bytes"
            )));
        }

        images.push(ExtractedImage { name, bytes });
    }

    if images.is_empty() {
        return Err(ArchiveError::NoImages);
    }

    Ok(Extraction { images, skipped })
}

fn corrupt(err: zip::result::ZipError) -> ArchiveError {
    ArchiveError::Corrupt(err.to_string())
}
