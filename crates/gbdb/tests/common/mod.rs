#![allow(dead_code)]

use std::{
    collections::HashMap,
    io::{Cursor, Write},
    sync::Mutex,
};

use gbdb::{error::FetchError, fetch::Source};
use gbdb_core::cartridge::{global_checksum, header_checksum};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

pub const BASE_URL: &str = "https://mirror.test/files/Game%20Boy/";

/// A 32 KiB image with a valid header for `title` and cartridge type `kind`.
pub fn rom(title: &str, kind: u8) -> Vec<u8> {
    let mut image = vec![0u8; 0x8000];
    image[0x134..0x134 + title.len()].copy_from_slice(title.as_bytes());
    image[0x147] = kind;
    image[0x14A] = 0x01;
    for (i, b) in image.iter_mut().enumerate().skip(0x150) {
        *b = (i as u8).wrapping_mul(7);
    }
    image[0x14D] = header_checksum(&image);
    let global = global_checksum(&image).to_be_bytes();
    image[0x14E] = global[0];
    image[0x14F] = global[1];
    image
}

pub fn zip_of(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in members {
        writer.start_file(*name, options).expect("start member");
        writer.write_all(data).expect("write member");
    }
    writer.finish().expect("finish archive").into_inner()
}

/// Listing page in the mirror's autoindex layout.
pub fn listing_page(archives: &[&str]) -> String {
    let rows: String = archives
        .iter()
        .map(|name| {
            let href = name.replace(' ', "%20");
            format!(
                "<tr><td class=\"link\"><a href=\"{href}\" title=\"{name}\">{name}</a></td><td class=\"size\">1 KiB</td></tr>\n"
            )
        })
        .collect();
    format!(
        "<html><body><table id=\"list\"><thead><tr><th>File Name</th><th>Size</th></tr></thead><tbody>\n\
         <tr><td class=\"link\"><a href=\"../\">Parent directory/</a></td><td>-</td></tr>\n\
         {rows}</tbody></table></body></html>"
    )
}

/// Serves fixed bodies from memory and records every requested URL.
#[derive(Debug, Default)]
pub struct MemorySource {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Source for MemorySource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().expect("request log").push(url.to_owned());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_owned(),
                status: 404,
            })
    }
}
