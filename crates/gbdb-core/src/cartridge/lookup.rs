//! Code → text tables for the single-byte header fields.
//!
//! Values follow the Pan Docs / No-Intro naming. Every lookup is total: a code
//! missing from its table renders as `Unknown (0xXX)`.

use std::borrow::Cow;

use phf::phf_map;

/// Which header field a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Byte 0x143, Game Boy Color support.
    CgbFlag,
    /// Byte 0x146, Super Game Boy support.
    SgbFlag,
    /// Byte 0x147, mapper and on-board components.
    CartridgeType,
    /// Byte 0x148.
    RomSize,
    /// Byte 0x149.
    RamSize,
    /// Byte 0x14A.
    Destination,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::CgbFlag,
        Table::SgbFlag,
        Table::CartridgeType,
        Table::RomSize,
        Table::RamSize,
        Table::Destination,
    ];

    fn entries(self) -> &'static phf::Map<u8, &'static str> {
        match self {
            Table::CgbFlag => &CGB_FLAGS,
            Table::SgbFlag => &SGB_FLAGS,
            Table::CartridgeType => &CARTRIDGE_TYPES,
            Table::RomSize => &ROM_SIZES,
            Table::RamSize => &RAM_SIZES,
            Table::Destination => &DESTINATIONS,
        }
    }

    /// Number of known codes in this table.
    pub fn len(self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(self) -> bool {
        self.entries().is_empty()
    }

    /// Known text for `code`, without the unknown fallback.
    pub fn get(self, code: u8) -> Option<&'static str> {
        self.entries().get(&code).copied()
    }
}

static CGB_FLAGS: phf::Map<u8, &'static str> = phf_map! {
    0x00u8 => "DMG",
    0x80u8 => "DMG+CGB",
    0xC0u8 => "CGB Only",
};

static SGB_FLAGS: phf::Map<u8, &'static str> = phf_map! {
    0x00u8 => "No",
    0x03u8 => "Yes",
};

static CARTRIDGE_TYPES: phf::Map<u8, &'static str> = phf_map! {
    0x00u8 => "ROM Only",
    0x01u8 => "MBC1",
    0x02u8 => "MBC1+RAM",
    0x03u8 => "MBC1+RAM+Battery",
    0x05u8 => "MBC2",
    0x06u8 => "MBC2+Battery",
    0x08u8 => "ROM+RAM",
    0x09u8 => "ROM+RAM+Battery",
    0x0Bu8 => "MMM01",
    0x0Cu8 => "MMM01+RAM",
    0x0Du8 => "MMM01+RAM+Battery",
    0x0Fu8 => "MBC3+Timer+Battery",
    0x10u8 => "MBC3+Timer+RAM+Battery",
    0x11u8 => "MBC3",
    0x12u8 => "MBC3+RAM",
    0x13u8 => "MBC3+RAM+Battery",
    0x19u8 => "MBC5",
    0x1Au8 => "MBC5+RAM",
    0x1Bu8 => "MBC5+RAM+Battery",
    0x1Cu8 => "MBC5+Rumble",
    0x1Du8 => "MBC5+Rumble+RAM",
    0x1Eu8 => "MBC5+Rumble+RAM+Battery",
    0x20u8 => "MBC6",
    0x22u8 => "MBC7+Sensor+Rumble+RAM+Battery",
    0xFCu8 => "Pocket Camera",
    0xFDu8 => "BANDAI TAMA5",
    0xFEu8 => "HuC3",
    0xFFu8 => "HuC1+RAM+Battery",
};

static ROM_SIZES: phf::Map<u8, &'static str> = phf_map! {
    0x00u8 => "32 KiB",
    0x01u8 => "64 KiB",
    0x02u8 => "128 KiB",
    0x03u8 => "256 KiB",
    0x04u8 => "512 KiB",
    0x05u8 => "1 MiB",
    0x06u8 => "2 MiB",
    0x07u8 => "4 MiB",
    0x08u8 => "8 MiB",
    0x52u8 => "1.1 MiB",
    0x53u8 => "1.2 MiB",
    0x54u8 => "1.5 MiB",
};

static RAM_SIZES: phf::Map<u8, &'static str> = phf_map! {
    0x00u8 => "None",
    0x01u8 => "2 KiB",
    0x02u8 => "8 KiB",
    0x03u8 => "32 KiB",
    0x04u8 => "128 KiB",
    0x05u8 => "64 KiB",
};

static DESTINATIONS: phf::Map<u8, &'static str> = phf_map! {
    0x00u8 => "Japanese",
    0x01u8 => "non-japanese",
};

/// Human readable text for `code` in `table`.
pub fn lookup(table: Table, code: u8) -> Cow<'static, str> {
    match table.get(code) {
        Some(text) => Cow::Borrowed(text),
        None => Cow::Owned(format!("Unknown (0x{code:02X})")),
    }
}

/// Mapper family of a cartridge type: the description up to the first `+`.
///
/// `0x13` ("MBC3+RAM+Battery") yields `"MBC3"`; unknown codes keep their
/// `Unknown (0xXX)` text.
pub fn mapper_base(cartridge_type: u8) -> Cow<'static, str> {
    match lookup(Table::CartridgeType, cartridge_type) {
        Cow::Borrowed(text) => Cow::Borrowed(text.split('+').next().unwrap_or(text).trim()),
        Cow::Owned(text) => Cow::Owned(text),
    }
}
