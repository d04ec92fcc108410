// ssprs-profile/src/oceanography/domain.rs

use super::equations;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TEMP_RANGE: (f64, f64) = (0.0, 40.0);
const SAL_RANGE: (f64, f64) = (0.0, 40.0);
// dbar, i.e. 1000 bar
const PRESSURE_RANGE: (f64, f64) = (0.0, 10000.0);

/// Optional domain validation in front of the permissive equations.
///
/// With `strict == false` every call forwards to the equation unchanged.
/// With `strict == true` inputs outside the published validity range
/// (T in [0, 40] °C, S in [0, 40] ppt, P in [0, 1000] bar) are rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCheck {
    pub strict: bool,
}

impl DomainCheck {
    pub fn permissive() -> Self {
        Self { strict: false }
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn speed(&self, d: f64, t: f64, s: f64, lat: f64) -> Result<f64, OceanographyError> {
        if self.strict {
            Self::validate_finite("depth", d)?;
            Self::validate_temperature(t)?;
            Self::validate_salinity(s)?;
            Self::validate_pressure(equations::d2p(d, lat))?;
        }
        Ok(equations::speed(d, t, s, lat))
    }

    pub fn sal(&self, d: f64, speed: f64, t: f64, lat: f64) -> Result<f64, OceanographyError> {
        if self.strict {
            Self::validate_finite("speed", speed)?;
            Self::validate_temperature(t)?;
            Self::validate_pressure(equations::d2p(d, lat))?;
        }
        Ok(equations::sal(d, speed, t, lat))
    }

    pub fn atg(&self, s: f64, t: f64, p: f64) -> Result<f64, OceanographyError> {
        if self.strict {
            Self::validate_salinity(s)?;
            Self::validate_temperature(t)?;
            Self::validate_pressure(p)?;
        }
        Ok(equations::atg(s, t, p))
    }

    pub fn pot_temp(&self, s: f64, t: f64, p: f64, pr: f64) -> Result<f64, OceanographyError> {
        if self.strict {
            Self::validate_salinity(s)?;
            Self::validate_temperature(t)?;
            Self::validate_pressure(p)?;
            Self::validate_pressure(pr)?;
        }
        Ok(equations::pot_temp(s, t, p, pr))
    }

    pub fn in_situ_temp(
        &self,
        s: f64,
        theta: f64,
        p: f64,
        pr: f64,
    ) -> Result<f64, OceanographyError> {
        if self.strict {
            Self::validate_salinity(s)?;
            Self::validate_temperature(theta)?;
            Self::validate_pressure(p)?;
            Self::validate_pressure(pr)?;
        }
        Ok(equations::in_situ_temp(s, theta, p, pr))
    }

    fn validate_finite(name: &'static str, value: f64) -> Result<(), OceanographyError> {
        if !value.is_finite() {
            return Err(OceanographyError::NonFinite(name, value));
        }
        Ok(())
    }

    fn validate_temperature(t: f64) -> Result<(), OceanographyError> {
        Self::validate_finite("temperature", t)?;
        if t < TEMP_RANGE.0 || t > TEMP_RANGE.1 {
            return Err(OceanographyError::TemperatureOutOfRange(t));
        }
        Ok(())
    }

    fn validate_salinity(s: f64) -> Result<(), OceanographyError> {
        Self::validate_finite("salinity", s)?;
        if s < SAL_RANGE.0 || s > SAL_RANGE.1 {
            return Err(OceanographyError::SalinityOutOfRange(s));
        }
        Ok(())
    }

    fn validate_pressure(p: f64) -> Result<(), OceanographyError> {
        Self::validate_finite("pressure", p)?;
        if p < PRESSURE_RANGE.0 || p > PRESSURE_RANGE.1 {
            return Err(OceanographyError::PressureOutOfRange(p));
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum OceanographyError {
    #[error("temperature must be in [0, 40] °C, but got {0}")]
    TemperatureOutOfRange(f64),
    #[error("salinity must be in [0, 40] ppt, but got {0}")]
    SalinityOutOfRange(f64),
    #[error("pressure must be in [0, 10000] dbar, but got {0}")]
    PressureOutOfRange(f64),
    #[error("{0} must be finite, but got {1}")]
    NonFinite(&'static str, f64),
}
