//! Game Boy cartridge header decoding.
//!
//! Every Game Boy / Game Boy Color image carries an 80 byte header at
//! `0x100..0x150`. Its layout is fixed, so decoding is a series of plain
//! offset reads. Nothing is interpreted here: codes stay raw and are turned
//! into text by [`super::lookup`].

use crate::error::Error;

/// Start of the header region (entry point).
pub const HEADER_START: usize = 0x100;
/// One past the last header byte; images shorter than this cannot be decoded.
pub const HEADER_END: usize = 0x150;

pub const TITLE_OFFSET: usize = 0x134;
pub const TITLE_LEN: usize = 11;
pub const CGB_FLAG_OFFSET: usize = 0x143;
pub const SGB_FLAG_OFFSET: usize = 0x146;
pub const CARTRIDGE_TYPE_OFFSET: usize = 0x147;
pub const ROM_SIZE_OFFSET: usize = 0x148;
pub const RAM_SIZE_OFFSET: usize = 0x149;
pub const DESTINATION_OFFSET: usize = 0x14A;
pub const OLD_LICENSEE_OFFSET: usize = 0x14B;
pub const VERSION_OFFSET: usize = 0x14C;
pub const HEADER_CHECKSUM_OFFSET: usize = 0x14D;
/// Big-endian global checksum occupies `0x14E..=0x14F`.
pub const GLOBAL_CHECKSUM_OFFSET: usize = 0x14E;

/// Raw header fields of one cartridge image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderFields {
    /// Up to 11 ASCII characters, trailing NULs removed.
    pub title: String,
    /// Set when a title byte was outside ASCII and got replaced with U+FFFD.
    pub title_lossy: bool,
    pub cgb_flag: u8,
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub destination_code: u8,
    pub old_licensee_code: u8,
    /// Mask ROM version number.
    pub version: u8,
    pub header_checksum: u8,
    pub global_checksum: u16,
}

impl HeaderFields {
    /// Decode the header of a full cartridge image.
    ///
    /// Only the first `0x150` bytes are read. Fails with
    /// [`Error::TruncatedImage`] when the image is shorter than that.
    pub fn decode(image: &[u8]) -> Result<Self, Error> {
        let header = image.get(..HEADER_END).ok_or(Error::TruncatedImage {
            actual: image.len(),
        })?;

        let (title, title_lossy) = decode_title(&header[TITLE_OFFSET..TITLE_OFFSET + TITLE_LEN]);

        Ok(Self {
            title,
            title_lossy,
            cgb_flag: header[CGB_FLAG_OFFSET],
            sgb_flag: header[SGB_FLAG_OFFSET],
            cartridge_type: header[CARTRIDGE_TYPE_OFFSET],
            rom_size_code: header[ROM_SIZE_OFFSET],
            ram_size_code: header[RAM_SIZE_OFFSET],
            destination_code: header[DESTINATION_OFFSET],
            old_licensee_code: header[OLD_LICENSEE_OFFSET],
            version: header[VERSION_OFFSET],
            header_checksum: header[HEADER_CHECKSUM_OFFSET],
            global_checksum: u16::from_be_bytes([
                header[GLOBAL_CHECKSUM_OFFSET],
                header[GLOBAL_CHECKSUM_OFFSET + 1],
            ]),
        })
    }
}

/// ASCII decode with replacement; returns the text and whether anything was replaced.
fn decode_title(bytes: &[u8]) -> (String, bool) {
    let mut lossy = false;
    let title: String = bytes
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                b as char
            } else {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect();

    (title.trim_end_matches('\0').to_owned(), lossy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image(len: usize) -> Vec<u8> {
        vec![0u8; len]
    }

    #[test]
    fn decodes_fixed_offsets() {
        let mut image = blank_image(HEADER_END);
        image[TITLE_OFFSET..TITLE_OFFSET + 6].copy_from_slice(b"TETRIS");
        image[CGB_FLAG_OFFSET] = 0x80;
        image[SGB_FLAG_OFFSET] = 0x03;
        image[CARTRIDGE_TYPE_OFFSET] = 0x1B;
        image[ROM_SIZE_OFFSET] = 0x05;
        image[RAM_SIZE_OFFSET] = 0x03;
        image[DESTINATION_OFFSET] = 0x01;
        image[OLD_LICENSEE_OFFSET] = 0x33;
        image[VERSION_OFFSET] = 0x02;
        image[HEADER_CHECKSUM_OFFSET] = 0xAB;
        image[GLOBAL_CHECKSUM_OFFSET] = 0x12;
        image[GLOBAL_CHECKSUM_OFFSET + 1] = 0x34;

        let fields = HeaderFields::decode(&image).expect("header decodes");

        assert_eq!(fields.title, "TETRIS");
        assert!(!fields.title_lossy);
        assert_eq!(fields.cgb_flag, 0x80);
        assert_eq!(fields.sgb_flag, 0x03);
        assert_eq!(fields.cartridge_type, 0x1B);
        assert_eq!(fields.rom_size_code, 0x05);
        assert_eq!(fields.ram_size_code, 0x03);
        assert_eq!(fields.destination_code, 0x01);
        assert_eq!(fields.old_licensee_code, 0x33);
        assert_eq!(fields.version, 0x02);
        assert_eq!(fields.header_checksum, 0xAB);
        assert_eq!(fields.global_checksum, 0x1234);
    }

    #[test]
    fn truncation_boundary() {
        assert!(HeaderFields::decode(&blank_image(HEADER_END)).is_ok());

        let err = HeaderFields::decode(&blank_image(HEADER_END - 1)).unwrap_err();
        assert_eq!(err, Error::TruncatedImage { actual: 0x14F });
    }

    #[test]
    fn title_replaces_non_ascii_and_flags_it() {
        let mut image = blank_image(HEADER_END);
        image[TITLE_OFFSET..TITLE_OFFSET + 4].copy_from_slice(&[b'P', 0xE9, b'K', b'A']);

        let fields = HeaderFields::decode(&image).expect("header decodes");

        assert_eq!(fields.title, "P\u{FFFD}KA");
        assert!(fields.title_lossy);
    }

    #[test]
    fn title_keeps_full_eleven_bytes_and_interior_nuls() {
        let mut image = blank_image(HEADER_END);
        image[TITLE_OFFSET..TITLE_OFFSET + TITLE_LEN].copy_from_slice(b"AB\0CDEFGHIJ");
        // Manufacturer code area right after the title.
        image[TITLE_OFFSET + TITLE_LEN] = b'Z';

        let fields = HeaderFields::decode(&image).expect("header decodes");

        assert_eq!(fields.title, "AB\0CDEFGHIJ");
    }
}
