//! The two checksums defined by the cartridge format.
//!
//! Both work on the full image rather than the header slice: the global
//! checksum covers every byte of the ROM.

use std::ops::Range;

use super::header::{GLOBAL_CHECKSUM_OFFSET, HeaderFields};

/// Bytes covered by the header checksum (`0x134..0x14D`, 25 bytes).
pub const HEADER_CHECKSUM_SPAN: Range<usize> = 0x134..0x14D;

/// Header checksum as computed by the boot ROM.
///
/// Bytes missing from a short image simply do not contribute.
pub fn header_checksum(image: &[u8]) -> u8 {
    image
        .iter()
        .take(HEADER_CHECKSUM_SPAN.end)
        .skip(HEADER_CHECKSUM_SPAN.start)
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1))
}

/// 16-bit sum of every byte, skipping the two bytes that store the result.
pub fn global_checksum(image: &[u8]) -> u16 {
    image
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != GLOBAL_CHECKSUM_OFFSET && i != GLOBAL_CHECKSUM_OFFSET + 1)
        .fold(0u16, |acc, (_, &b)| acc.wrapping_add(b as u16))
}

/// Whether the stored checksums match the computed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChecksumVerdict {
    pub header_valid: bool,
    pub global_valid: bool,
}

impl ChecksumVerdict {
    /// Check `fields` (decoded from `image`) against the full image.
    pub fn verify(image: &[u8], fields: &HeaderFields) -> Self {
        Self {
            header_valid: header_checksum(image) == fields.header_checksum,
            global_valid: global_checksum(image) == fields.global_checksum,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.header_valid && self.global_valid
    }
}
