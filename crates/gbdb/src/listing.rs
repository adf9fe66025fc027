//! Archive discovery from HTML directory listings.
//!
//! Mirrors publish each collection as an autoindex page whose file table looks
//! like:
//!
//! ```html
//! <table id="list">
//!   <tr><th>File Name</th>...</tr>
//!   <tr><td class="link"><a href="Tetris%20(World).zip" title="Tetris (World).zip">...</a></td>...</tr>
//! </table>
//! ```
//!
//! Only `.zip` links inside that table are collected. The page is read with
//! `quick-xml` in a lenient mode, which copes with the unclosed tags HTML allows.

use std::borrow::Cow;

use gbdb_core::record::strip_archive_suffix;
use quick_xml::{
    Reader,
    escape::{resolve_predefined_entity, unescape},
    events::{BytesRef, BytesStart, Event},
};
use tracing::{debug, error, info, warn};

use crate::fetch::Source;

/// An archive found in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveEntry {
    /// Absolute download URL.
    pub url: String,
    /// Display name without the archive extension.
    pub filename: String,
}

/// Fetch every listing in `urls` and collect their archives.
///
/// A listing that cannot be fetched is logged and skipped.
pub fn discover(source: &dyn Source, urls: &[String], skip_bios: bool) -> Vec<ArchiveEntry> {
    let mut entries = Vec::new();
    for url in urls {
        match source.fetch(url) {
            Ok(body) => {
                let html = String::from_utf8_lossy(&body);
                let found = parse_listing(url, &html, skip_bios);
                info!("Found {} ZIP files at {}", found.len(), url);
                entries.extend(found);
            }
            Err(err) => error!("Error fetching directory {url}: {err}"),
        }
    }
    entries
}

/// Extract archive entries from one listing page served at `base_url`.
///
/// Malformed markup is logged and skipped; rows after it are still read.
pub fn parse_listing(base_url: &str, html: &str, skip_bios: bool) -> Vec<ArchiveEntry> {
    let html = escape_bare_ampersands(html);
    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut scan = ListingScan::new(base_url, skip_bios);
    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(tag)) => scan.open(&tag),
            Ok(Event::Empty(tag)) => {
                scan.open(&tag);
                scan.close(tag.name().as_ref());
            }
            Ok(Event::End(tag)) => scan.close(tag.name().as_ref()),
            Ok(Event::Text(text)) => scan.text(&String::from_utf8_lossy(&text)),
            Ok(Event::GeneralRef(entity)) => scan.text(&entity_text(&entity)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(
                    "Malformed markup in listing {base_url} at byte {}: {err}",
                    reader.error_position()
                );
                if reader.buffer_position() == position {
                    break;
                }
            }
        }
    }

    scan.entries
}

/// Longest entity name accepted as a reference (`&thetasym;`, `&#x1F600;`).
const MAX_ENTITY_LEN: usize = 10;

/// Rewrite every `&` that does not start a `&name;` / `&#NN;` reference as
/// `&amp;`, the way browsers read hand-written listings.
fn escape_bare_ampersands(html: &str) -> Cow<'_, str> {
    if !html.contains('&') {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len() + 16);
    let mut rest = html;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let name_len = after
            .bytes()
            .take(MAX_ENTITY_LEN + 1)
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'#')
            .count();
        if name_len > 0 && name_len <= MAX_ENTITY_LEN && after[name_len..].starts_with(';') {
            out.push('&');
        } else {
            out.push_str("&amp;");
        }
        rest = after;
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[derive(Debug)]
struct PendingLink {
    href: String,
    title: String,
    text: String,
}

#[derive(Debug)]
struct ListingScan<'a> {
    base_url: &'a str,
    skip_bios: bool,
    in_table: bool,
    in_link_cell: bool,
    /// Current row holds `<th>` cells.
    header_row: bool,
    link: Option<PendingLink>,
    entries: Vec<ArchiveEntry>,
}

impl<'a> ListingScan<'a> {
    fn new(base_url: &'a str, skip_bios: bool) -> Self {
        Self {
            base_url,
            skip_bios,
            in_table: false,
            in_link_cell: false,
            header_row: false,
            link: None,
            entries: Vec::new(),
        }
    }

    fn open(&mut self, tag: &BytesStart<'_>) {
        let name = tag.name();
        let name = name.as_ref();

        if name.eq_ignore_ascii_case(b"table") {
            if attribute(tag, b"id").as_deref() == Some("list") {
                self.in_table = true;
            }
            return;
        }
        if !self.in_table {
            return;
        }

        if name.eq_ignore_ascii_case(b"tr") {
            self.header_row = false;
        } else if name.eq_ignore_ascii_case(b"th") {
            self.header_row = true;
        } else if name.eq_ignore_ascii_case(b"td") {
            if attribute(tag, b"class").as_deref() == Some("link") {
                self.in_link_cell = true;
            }
        } else if name.eq_ignore_ascii_case(b"a") && self.in_link_cell && !self.header_row {
            let href = attribute(tag, b"href").unwrap_or_default();
            if href.ends_with(".zip") {
                self.link = Some(PendingLink {
                    href,
                    title: attribute(tag, b"title").unwrap_or_default(),
                    text: String::new(),
                });
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(link) = &mut self.link {
            link.text.push_str(text);
        }
    }

    fn close(&mut self, name: &[u8]) {
        if name.eq_ignore_ascii_case(b"table") {
            self.in_table = false;
            self.in_link_cell = false;
        } else if name.eq_ignore_ascii_case(b"tr") {
            self.header_row = false;
        } else if name.eq_ignore_ascii_case(b"td") {
            self.in_link_cell = false;
        } else if name.eq_ignore_ascii_case(b"a") {
            if let Some(link) = self.link.take() {
                self.finish(link);
            }
        }
    }

    fn finish(&mut self, link: PendingLink) {
        let display = if link.title.is_empty() {
            link.text.trim()
        } else {
            link.title.as_str()
        };
        let filename = strip_archive_suffix(display).to_owned();

        if filename.is_empty() {
            debug!("Skipping unnamed link {}", link.href);
            return;
        }
        if self.skip_bios && filename.contains("[BIOS]") {
            debug!("Skipping BIOS file: {filename}");
            return;
        }

        self.entries.push(ArchiveEntry {
            url: resolve_url(self.base_url, &link.href),
            filename,
        });
    }
}

/// Attribute value with XML/HTML entities resolved where possible.
fn attribute(tag: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    tag.html_attributes()
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(key))
        .map(|attr| {
            let raw = String::from_utf8_lossy(&attr.value).into_owned();
            let unescaped = unescape(&raw).map(|value| value.into_owned()).ok();
            unescaped.unwrap_or(raw)
        })
}

/// Text for an entity reference in link text; unknown entities are kept verbatim.
fn entity_text(entity: &BytesRef<'_>) -> String {
    if let Ok(Some(ch)) = entity.resolve_char_ref() {
        return ch.to_string();
    }
    let name = String::from_utf8_lossy(entity);
    match resolve_predefined_entity(&name) {
        Some(text) => text.to_owned(),
        None => format!("&{name};"),
    }
}

/// Resolve `href` against the listing URL it was found on.
pub fn resolve_url(base: &str, href: &str) -> String {
    if href.contains("://") {
        return href.to_owned();
    }

    let scheme_end = base.find("://").map(|idx| idx + 3);
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = scheme_end.map_or("https://", |end| &base[..end]);
        return format!("{scheme}{rest}");
    }
    if href.starts_with('/') {
        let origin_end = scheme_end
            .and_then(|start| base[start..].find('/').map(|idx| start + idx))
            .unwrap_or(base.len());
        return format!("{}{href}", &base[..origin_end]);
    }

    let dir_end = base.rfind('/').map_or(base.len(), |idx| idx + 1);
    let dir_end = match scheme_end {
        Some(start) if dir_end <= start => base.len(),
        _ => dir_end,
    };
    let href = href.strip_prefix("./").unwrap_or(href);
    if dir_end == base.len() && !base.ends_with('/') {
        format!("{base}/{href}")
    } else {
        format!("{}{href}", &base[..dir_end])
    }
}
