//! Catalog records.
//!
//! An [`OutputRecord`] is the textual, serializable view of one cartridge
//! image. Field names in the serialized form are part of the catalog format
//! and must not change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cartridge::{
    checksum::ChecksumVerdict,
    features::FeatureFlags,
    header::HeaderFields,
    lookup::{Table, lookup, mapper_base},
};

/// Container extensions stripped from the source name.
const ARCHIVE_SUFFIXES: [&str; 2] = [".zip", ".7z"];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OutputRecord {
    /// Archive name without its container extension.
    pub filename: String,
    /// Image name inside the archive.
    #[cfg_attr(feature = "serde", serde(rename = "rom_filename"))]
    pub rom_filename: String,
    pub title: String,
    pub cgb_flag: String,
    pub sgb_flag: String,
    pub region: String,
    pub version: u8,
    pub rom_size: String,
    pub ram_size: String,
    pub has_ram: bool,
    pub mapper: String,
    pub has_timer: bool,
    pub has_rumble: bool,
    pub has_battery: bool,
    pub header_checksum: u8,
    pub global_checksum: u16,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub header_checksum_valid: Option<bool>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub global_checksum_valid: Option<bool>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub md5: Option<String>,
    /// Title needed lossy decoding. Diagnostic only, not part of the catalog.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub title_lossy: bool,
}

impl OutputRecord {
    /// Combine the per-image results into a record.
    pub fn assemble(
        source_name: &str,
        image_name: &str,
        fields: &HeaderFields,
        verdict: Option<ChecksumVerdict>,
        flags: FeatureFlags,
        content_hash: Option<String>,
    ) -> Self {
        Self {
            filename: strip_archive_suffix(source_name).to_owned(),
            rom_filename: image_name.to_owned(),
            title: fields.title.clone(),
            cgb_flag: lookup(Table::CgbFlag, fields.cgb_flag).into_owned(),
            sgb_flag: lookup(Table::SgbFlag, fields.sgb_flag).into_owned(),
            region: lookup(Table::Destination, fields.destination_code).into_owned(),
            version: fields.version,
            rom_size: lookup(Table::RomSize, fields.rom_size_code).into_owned(),
            ram_size: lookup(Table::RamSize, fields.ram_size_code).into_owned(),
            has_ram: flags.has_ram(),
            mapper: mapper_base(fields.cartridge_type).into_owned(),
            has_timer: flags.has_timer(),
            has_rumble: flags.has_rumble(),
            has_battery: flags.has_battery(),
            header_checksum: fields.header_checksum,
            global_checksum: fields.global_checksum,
            header_checksum_valid: verdict.map(|v| v.header_valid),
            global_checksum_valid: verdict.map(|v| v.global_valid),
            md5: content_hash,
            title_lossy: fields.title_lossy,
        }
    }

    /// Lowercase extension of the image name (`".gbc"`), empty when it has none.
    pub fn image_extension(&self) -> String {
        match self.rom_filename.rfind('.') {
            Some(idx) if idx > 0 => self.rom_filename[idx..].to_ascii_lowercase(),
            _ => String::new(),
        }
    }
}

/// `"Tetris (World).zip"` → `"Tetris (World)"`. Names without a known
/// container extension are returned unchanged.
pub fn strip_archive_suffix(name: &str) -> &str {
    for suffix in ARCHIVE_SUFFIXES {
        if name.len() > suffix.len() {
            let split = name.len() - suffix.len();
            if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(suffix) {
                return &name[..split];
            }
        }
    }
    name
}
