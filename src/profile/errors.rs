// ssprs-profile/src/profile/errors.rs

use super::dicts::DictError;
use crate::dyn_height::DynHeightError;
use crate::oceanography::OceanographyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("{0} samples are not initialized")]
    EmptySamples(&'static str),
    #[error("{0} has {1} usable samples but at least {2} are required")]
    NotEnoughValidSamples(&'static str, usize, usize),
    #[error("sample index {0} is out of range for {1} samples")]
    IndexOutOfRange(usize, usize),
    #[error("latitude must be in [-90, 90], but got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be in [-180, 180], but got {0}")]
    InvalidLongitude(f64),
    #[error("thinning tolerance must be >= 0, but got {0}")]
    InvalidTolerance(f64),
    #[error("depth must be finite, but got {0}")]
    InvalidDepth(f64),
    #[error("Invalid extender profile: {0}")]
    InvalidExtender(String),
    #[error("Missing required metadata field: {0}")]
    MissingMetadata(&'static str),
    #[error(transparent)]
    MinMaxError(#[from] ndarray_stats::errors::MinMaxError),
    #[error(transparent)]
    OceanographyError(#[from] OceanographyError),
    #[error(transparent)]
    DynHeightError(#[from] DynHeightError),
    #[error(transparent)]
    DictError(#[from] DictError),
}
