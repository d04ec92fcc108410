// ssprs-profile/src/oceanography/mod.rs

mod domain;
mod equations;

pub use domain::{DomainCheck, OceanographyError};
pub use equations::{
    atg, d2p, d2p_array, gravity, in_situ_temp, p2d, p2d_array, pot_temp, sal, sal_array, speed,
    speed_array, DEFAULT_LATITUDE,
};
