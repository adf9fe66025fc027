use std::fmt;

use crate::cartridge::header::HEADER_END;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Provided image is too short to hold the cartridge header (0x150 bytes).
    TruncatedImage { actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedImage { actual } => {
                write!(
                    f,
                    "image expected at least {HEADER_END:#06X} bytes, got {actual:#06X}"
                )
            }
        }
    }
}

impl std::error::Error for Error {}
