//! Cartridge image inspection.
//!
//! The pieces here are pure functions over an image buffer:
//! - [`HeaderFields::decode`] reads the fixed header at `0x100..0x150`.
//! - [`ChecksumVerdict::verify`] checks the header and global checksums.
//! - [`FeatureFlags::classify`] derives on-board components from the cartridge type.
//! - [`lookup`] turns raw codes into catalog text.
//!
//! [`process_image`] chains them into one [`OutputRecord`].

pub mod checksum;
pub mod digest;
pub mod features;
pub mod header;
pub mod lookup;

pub use checksum::{ChecksumVerdict, global_checksum, header_checksum};
pub use digest::content_hash;
pub use features::FeatureFlags;
pub use header::{HEADER_END, HeaderFields};
pub use lookup::{Table, lookup, mapper_base};

use crate::{error::Error, record::OutputRecord};

/// Which optional steps [`process_image`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Verify header and global checksums. When off, the record carries no verdict.
    pub compute_checksums: bool,
    /// Attach an MD5 of the full image.
    pub compute_content_hash: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            compute_checksums: true,
            compute_content_hash: false,
        }
    }
}

/// Decode, verify, classify and assemble one image.
///
/// `source_name` is the archive the image came from and `image_name` its
/// name inside that archive.
pub fn process_image(
    source_name: &str,
    image_name: &str,
    image: &[u8],
    options: &ProcessOptions,
) -> Result<OutputRecord, Error> {
    let fields = HeaderFields::decode(image)?;
    let verdict = options
        .compute_checksums
        .then(|| ChecksumVerdict::verify(image, &fields));
    let flags = FeatureFlags::classify(fields.cartridge_type);
    let hash = options.compute_content_hash.then(|| content_hash(image));

    Ok(OutputRecord::assemble(
        source_name,
        image_name,
        &fields,
        verdict,
        flags,
        hash,
    ))
}
