#![allow(dead_code)]

use gbdb_core::cartridge::{global_checksum, header_checksum};

pub const TITLE_OFFSET: usize = 0x134;

/// Builds synthetic cartridge images with a well-formed header.
#[derive(Debug, Clone)]
pub struct RomBuilder {
    image: Vec<u8>,
}

impl RomBuilder {
    pub fn new(len: usize) -> Self {
        Self {
            image: vec![0u8; len],
        }
    }

    pub fn title(mut self, title: &[u8]) -> Self {
        self.image[TITLE_OFFSET..TITLE_OFFSET + title.len()].copy_from_slice(title);
        self
    }

    pub fn byte(mut self, offset: usize, value: u8) -> Self {
        self.image[offset] = value;
        self
    }

    /// Fill the area after the header with a deterministic pattern.
    pub fn program(mut self, seed: u8) -> Self {
        for (i, b) in self.image.iter_mut().enumerate().skip(0x150) {
            *b = (i as u8).wrapping_mul(31).wrapping_add(seed);
        }
        self
    }

    /// Write both checksums the way a conforming assembler would.
    pub fn sealed(mut self) -> Vec<u8> {
        self.image[0x14D] = header_checksum(&self.image);
        let global = global_checksum(&self.image).to_be_bytes();
        self.image[0x14E] = global[0];
        self.image[0x14F] = global[1];
        self.image
    }

    pub fn build(self) -> Vec<u8> {
        self.image
    }
}
