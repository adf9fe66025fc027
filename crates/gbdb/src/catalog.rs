//! The catalog file: a JSON array of [`OutputRecord`]s sorted by archive name.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use gbdb_core::OutputRecord;

use crate::error::CatalogError;

/// Abbreviations whose trailing period is dropped rather than turned into a space.
const ABBREVIATIONS: [&str; 10] = [
    "dr", "mr", "mrs", "ms", "prof", "inc", "ltd", "co", "corp", "llc",
];

const ARTICLES: [&str; 3] = ["The", "An", "A"];

const TITLE_EXTENSIONS: [&str; 3] = [".gbc", ".gbx", ".gb"];

/// Order records by archive name, then by image name.
pub fn sort_records(records: &mut [OutputRecord]) {
    records.sort_by(|a, b| {
        a.filename
            .cmp(&b.filename)
            .then_with(|| a.rom_filename.cmp(&b.rom_filename))
    });
}

/// Write `records` as a pretty-printed JSON array.
pub fn write_catalog(path: &Path, records: &[OutputRecord]) -> Result<(), CatalogError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_catalog(path: &Path) -> Result<Vec<OutputRecord>, CatalogError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    /// Record count per lowercase image extension (`".gb"`, `".gbc"`).
    pub by_extension: BTreeMap<String, usize>,
}

impl CatalogStats {
    pub fn from_records(records: &[OutputRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            *stats
                .by_extension
                .entry(record.image_extension())
                .or_default() += 1;
        }
        stats
    }
}

/// Reduce a No-Intro name to the bare game title.
///
/// `"Legend of Zelda, The - Link's Awakening (USA)"` becomes
/// `"The Legend of Zelda - Link's Awakening"`.
pub fn base_title(filename: &str) -> String {
    let mut base = filename;
    for ext in TITLE_EXTENSIONS {
        if base.len() > ext.len() {
            let split = base.len() - ext.len();
            if base.is_char_boundary(split) && base[split..].eq_ignore_ascii_case(ext) {
                base = &base[..split];
                break;
            }
        }
    }

    let trimmed = base.trim_end();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.rfind('(') {
            if !trimmed[open + 1..trimmed.len() - 1].contains(')') {
                base = trimmed[..open].trim_end();
            }
        }
    }

    match reorder_article(base) {
        Some(reordered) => reordered,
        None => base.trim().to_owned(),
    }
}

/// `"Head, The - Sub"` → `"The Head - Sub"`. Uses the last comma that is
/// followed by an article.
fn reorder_article(base: &str) -> Option<String> {
    base.match_indices(',').rev().find_map(|(comma, _)| {
        let head = &base[..comma];
        let rest = base[comma + 1..].trim_start();
        ARTICLES.iter().find_map(|article| {
            let word = rest.get(..article.len())?;
            if !word.eq_ignore_ascii_case(article) {
                return None;
            }
            let tail = rest[article.len()..].trim_start();
            if tail.is_empty() {
                return Some(format!("{word} {}", head.trim()));
            }
            let subtitle = tail.strip_prefix('-')?.trim();
            Some(if subtitle.is_empty() {
                format!("{word} {}", head.trim())
            } else {
                format!("{word} {} - {subtitle}", head.trim())
            })
        })
    })
}

/// Lowercase a title for matching. Periods after common abbreviations are
/// dropped, other characters outside `[a-z0-9.]` become spaces, and runs of
/// spaces collapse.
pub fn normalize_title(title: &str) -> String {
    let lower = title.to_lowercase();
    let mut cleaned = String::with_capacity(lower.len());
    let mut word = String::new();

    for ch in lower.chars() {
        if ch == '.' && ABBREVIATIONS.contains(&word.as_str()) {
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            word.push(ch);
            cleaned.push(ch);
        } else if ch == '.' {
            word.clear();
            cleaned.push('.');
        } else {
            word.clear();
            cleaned.push(' ');
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Records whose normalized base title contains every token of `query`.
///
/// Titles starting with the query come first; ties are ordered by archive
/// name. At most `limit` records are returned.
pub fn search<'a>(records: &'a [OutputRecord], query: &str, limit: usize) -> Vec<&'a OutputRecord> {
    let query = normalize_title(query);
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(bool, &OutputRecord)> = records
        .iter()
        .filter_map(|record| {
            let title = normalize_title(&base_title(&record.filename));
            tokens
                .iter()
                .all(|token| title.contains(token))
                .then(|| (title.starts_with(&query), record))
        })
        .collect();

    hits.sort_by(|(a_prefix, a), (b_prefix, b)| {
        b_prefix
            .cmp(a_prefix)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    hits.into_iter().take(limit).map(|(_, record)| record).collect()
}
