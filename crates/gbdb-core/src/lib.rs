//! Game Boy cartridge header extraction and validation.
//!
//! Everything in this crate is pure: no I/O, no logging, no shared state. Callers
//! hand in a ROM image and get back an [`OutputRecord`] or an [`Error`] scoped
//! to that one image, so the functions can be called from any number of
//! threads at once.

pub mod cartridge;
pub mod error;
pub mod record;

pub use cartridge::{ProcessOptions, process_image};
pub use error::Error;
pub use record::OutputRecord;
