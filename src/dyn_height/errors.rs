// ssprs-profile/src/dyn_height/errors.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DynHeightError {
    #[error("Unitialized field on DynHeightBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("SA, CT and p must have the same length. Got lengths {0}, {1} and {2} respectively")]
    LengthMismatch(usize, usize, usize),
    #[error("At least 2 samples are required, but got {0}")]
    TooFewSamples(usize),
    #[error("Sea pressure must be non-negative, but got {0}")]
    NegativePressure(f64),
    #[error("Sea pressure must be finite, but p[{0}]={1}")]
    NonFinitePressure(usize, f64),
    #[error("Sea pressure must not exceed {1} dbar, but got {0}")]
    PressureOutOfRange(f64, f64),
    #[error("Refined grid would need {0} nodes, more than the limit of {1}")]
    GridTooLarge(usize, usize),
    #[error("Duplicate pressure {1} at index {0}")]
    DuplicatePressure(usize, f64),
    #[error("Pressure must be strictly increasing, but p[{0}]={2} follows {1}")]
    NonMonotonicPressure(usize, f64, f64),
    #[error("Reference pressure {0} must be in [0, {1}]")]
    ReferencePressureOutOfRange(f64, f64),
    #[error("max_dp_i must be > 0, but got {0}")]
    InvalidMaxDp(f64),
}
