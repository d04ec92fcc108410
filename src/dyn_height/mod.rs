// ssprs-profile/src/dyn_height/mod.rs

mod errors;
mod integrator;
mod specvol;

pub use errors::DynHeightError;
pub use integrator::{
    depth_from_pressure, geo_strf_dyn_height, DynHeightBuilder, DynamicHeight, DEFAULT_MAX_DP_I,
    MAX_SEA_PRESSURE,
};
pub use specvol::{density, specvol_anom, SSO};
