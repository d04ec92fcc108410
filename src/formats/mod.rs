// ssprs-profile/src/formats/mod.rs

//! Readers and writers that move profiles in and out of files.

mod asvp;
mod bsvp;
mod callbacks;
mod csv_writer;
mod errors;
mod helpers;

pub use asvp::{AsvpReader, AsvpWriter};
pub use bsvp::{BsvpReader, BsvpWriter, Cast, CastIter, CastRecord};
pub use callbacks::{Callbacks, FixedCallbacks, NoCallbacks};
pub use csv_writer::CsvWriter;
pub use errors::FormatError;
pub use helpers::{finalize_profiles, read_binary, read_text_lines};

use crate::profile::{Profile, ProfileList};
use crate::settings::ProcessingSettings;
use std::path::Path;

/// Parses one file format into fully initialized profiles.
pub trait FormatReader {
    fn read(
        &self,
        path: &Path,
        settings: &ProcessingSettings,
        callbacks: &mut dyn Callbacks,
    ) -> Result<ProfileList, FormatError>;
}

/// Serializes a profile without modifying it.
pub trait FormatWriter {
    fn write(&self, profile: &Profile, path: &Path) -> Result<(), FormatError>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn reader_for_path(path: &Path) -> Result<Box<dyn FormatReader>, FormatError> {
    match extension(path).as_deref() {
        Some("asvp") => Ok(Box::new(AsvpReader)),
        Some("bsvp") => Ok(Box::new(BsvpReader)),
        _ => Err(FormatError::UnsupportedFormat(path.to_path_buf())),
    }
}

pub fn writer_for_path(path: &Path) -> Result<Box<dyn FormatWriter>, FormatError> {
    match extension(path).as_deref() {
        Some("asvp") => Ok(Box::new(AsvpWriter)),
        Some("bsvp") => Ok(Box::new(BsvpWriter)),
        Some("csv") => Ok(Box::new(CsvWriter)),
        _ => Err(FormatError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_extension() {
        assert!(reader_for_path(Path::new("cast.ASVP")).is_ok());
        assert!(reader_for_path(Path::new("casts.bsvp")).is_ok());
        assert!(matches!(
            reader_for_path(Path::new("cast.csv")),
            Err(FormatError::UnsupportedFormat(_))
        ));
        assert!(writer_for_path(Path::new("cast.csv")).is_ok());
        assert!(writer_for_path(Path::new("cast")).is_err());
    }
}
