// ssprs-profile/src/formats/errors.rs

use crate::profile::ProfileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("{0}:{1}: {2}")]
    ParseError(PathBuf, usize, String),
    #[error("{0}: missing or malformed header")]
    MissingHeader(PathBuf),
    #[error("{0}: no casts found")]
    NoProfiles(PathBuf),
    #[error("{0}: cast starting at byte {1} is truncated")]
    TruncatedCast(PathBuf, u64),
    #[error("{0}: unsupported file extension")]
    UnsupportedFormat(PathBuf),
    #[error("{0}: sample count must fit in an i32, but got {1}")]
    TooManySamples(PathBuf, usize),
    #[error(transparent)]
    ProfileError(#[from] ProfileError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    BinrwError(#[from] binrw::Error),
    #[error(transparent)]
    CsvError(#[from] csv::Error),
}
