mod common;

use common::RomBuilder;
use gbdb_core::{Error, ProcessOptions, cartridge::HeaderFields, process_image};

fn mbc3_test_rom() -> Vec<u8> {
    RomBuilder::new(0x8000)
        .program(7)
        .title(b"TESTROM")
        .byte(0x143, 0x00)
        .byte(0x147, 0x13)
        .byte(0x148, 0x02)
        .byte(0x149, 0x03)
        .sealed()
}

#[test]
fn mbc3_battery_cartridge_end_to_end() {
    let image = mbc3_test_rom();

    let record = process_image(
        "Test Rom (World).zip",
        "Test Rom (World).gb",
        &image,
        &ProcessOptions::default(),
    )
    .expect("image processes");

    assert_eq!(record.filename, "Test Rom (World)");
    assert_eq!(record.rom_filename, "Test Rom (World).gb");
    assert_eq!(record.title, "TESTROM");
    assert_eq!(record.mapper, "MBC3");
    assert_eq!(record.cgb_flag, "DMG");
    assert_eq!(record.rom_size, "128 KiB");
    assert_eq!(record.ram_size, "32 KiB");
    assert!(record.has_battery);
    assert!(record.has_ram);
    assert!(!record.has_timer);
    assert!(!record.has_rumble);
    assert_eq!(record.header_checksum_valid, Some(true));
    assert_eq!(record.global_checksum_valid, Some(true));
    assert!(!record.title_lossy);
}

#[test]
fn corrupted_program_fails_only_global_checksum() {
    let mut image = mbc3_test_rom();
    image[0x4000] ^= 0xFF;

    let record = process_image("a", "a.gb", &image, &ProcessOptions::default())
        .expect("image processes");

    assert_eq!(record.header_checksum_valid, Some(true));
    assert_eq!(record.global_checksum_valid, Some(false));
}

#[test]
fn corrupted_title_fails_both_checksums() {
    let mut image = mbc3_test_rom();
    image[0x134] = b'X';

    let record = process_image("a", "a.gb", &image, &ProcessOptions::default())
        .expect("image processes");

    assert_eq!(record.header_checksum_valid, Some(false));
    assert_eq!(record.global_checksum_valid, Some(false));
}

#[test]
fn unknown_codes_render_as_unknown() {
    let image = RomBuilder::new(0x150)
        .byte(0x143, 0x42)
        .byte(0x146, 0x01)
        .byte(0x147, 0x04)
        .byte(0x148, 0x09)
        .byte(0x149, 0x06)
        .byte(0x14A, 0x02)
        .sealed();

    let record = process_image("a", "a.gb", &image, &ProcessOptions::default())
        .expect("image processes");

    assert_eq!(record.cgb_flag, "Unknown (0x42)");
    assert_eq!(record.sgb_flag, "Unknown (0x01)");
    assert_eq!(record.mapper, "Unknown (0x04)");
    assert_eq!(record.rom_size, "Unknown (0x09)");
    assert_eq!(record.ram_size, "Unknown (0x06)");
    assert_eq!(record.region, "Unknown (0x02)");
    assert!(!record.has_ram && !record.has_battery && !record.has_timer && !record.has_rumble);
}

#[test]
fn lossy_title_is_observable_but_not_fatal() {
    let image = RomBuilder::new(0x150).title(&[b'A', 0xFF, b'B']).sealed();

    let record = process_image("a", "a.gb", &image, &ProcessOptions::default())
        .expect("image processes");

    assert_eq!(record.title, "A\u{FFFD}B");
    assert!(record.title_lossy);
}

#[test]
fn truncation_boundary() {
    assert!(HeaderFields::decode(&[0u8; 0x150]).is_ok());
    assert_eq!(
        HeaderFields::decode(&[0u8; 0x14F]),
        Err(Error::TruncatedImage { actual: 0x14F })
    );
}

#[cfg(feature = "serde")]
#[test]
fn record_round_trips_through_json() {
    let options = ProcessOptions {
        compute_checksums: true,
        compute_content_hash: true,
    };
    let record = process_image("a.zip", "a.gb", &mbc3_test_rom(), &options).expect("processes");

    let json = serde_json::to_string(&record).expect("serializes");
    assert!(json.contains("\"md5\""));
    assert!(!json.contains("title_lossy"));

    let back: gbdb_core::OutputRecord = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back, record);
}

#[cfg(feature = "serde")]
#[test]
fn optional_fields_are_omitted_when_not_computed() {
    let options = ProcessOptions {
        compute_checksums: false,
        compute_content_hash: false,
    };
    let record = process_image("a.zip", "a.gb", &mbc3_test_rom(), &options).expect("processes");

    let json = serde_json::to_string(&record).expect("serializes");
    assert!(!json.contains("headerChecksumValid"));
    assert!(!json.contains("globalChecksumValid"));
    assert!(!json.contains("md5"));
}
