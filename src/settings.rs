// ssprs-profile/src/settings.rs

//! Processing options shared by the readers and the editing pipeline.

use crate::oceanography::{DomainCheck, DEFAULT_LATITUDE};
use crate::profile::{Direction, Source};
use derive_builder::Builder;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_THIN_TOLERANCE: f64 = 0.1;

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ProcessingSettings {
    /// Cast direction kept by `reduce_up_down`.
    #[builder(default = "Direction::Down")]
    pub ssp_up_or_down: Direction,
    /// Reject out-of-range temperature, salinity and pressure instead of
    /// evaluating the equations outside their published domain.
    #[builder(default = "false")]
    pub strict_domain_checks: bool,
    /// Douglas-Peucker tolerance in m/s.
    #[builder(default = "DEFAULT_THIN_TOLERANCE")]
    pub thin_tolerance: f64,
    /// Latitude used by readers when a cast carries no position.
    #[builder(default = "DEFAULT_LATITUDE")]
    pub default_latitude: f64,
    /// Maximum pressure step (dbar) of the dynamic height grid.
    #[builder(default = "crate::dyn_height::DEFAULT_MAX_DP_I")]
    pub max_dp_i: f64,
    /// Source stamped on samples appended by an extension.
    #[builder(default = "Source::Extension")]
    pub extension_source: Source,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            ssp_up_or_down: Direction::Down,
            strict_domain_checks: false,
            thin_tolerance: DEFAULT_THIN_TOLERANCE,
            default_latitude: DEFAULT_LATITUDE,
            max_dp_i: crate::dyn_height::DEFAULT_MAX_DP_I,
            extension_source: Source::Extension,
        }
    }
}

impl ProcessingSettings {
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let reader = BufReader::new(File::open(path)?);
        let settings: Self = serde_json::from_reader(reader)?;
        settings.validate()?;
        debug!("loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), SettingsError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn domain_check(&self) -> DomainCheck {
        DomainCheck {
            strict: self.strict_domain_checks,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        Self::validate_thin_tolerance(self.thin_tolerance)?;
        Self::validate_default_latitude(self.default_latitude)?;
        Self::validate_max_dp_i(self.max_dp_i)?;
        Ok(())
    }

    fn validate_thin_tolerance(thin_tolerance: f64) -> Result<(), SettingsError> {
        if thin_tolerance.is_nan() || thin_tolerance < 0.0 {
            return Err(SettingsError::InvalidThinTolerance(thin_tolerance));
        }
        Ok(())
    }

    fn validate_default_latitude(default_latitude: f64) -> Result<(), SettingsError> {
        if !(-90.0..=90.0).contains(&default_latitude) {
            return Err(SettingsError::InvalidDefaultLatitude(default_latitude));
        }
        Ok(())
    }

    fn validate_max_dp_i(max_dp_i: f64) -> Result<(), SettingsError> {
        if max_dp_i.is_nan() || max_dp_i <= 0.0 {
            return Err(SettingsError::InvalidMaxDp(max_dp_i));
        }
        Ok(())
    }
}

impl ProcessingSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(thin_tolerance) = self.thin_tolerance {
            ProcessingSettings::validate_thin_tolerance(thin_tolerance)
                .map_err(|e| e.to_string())?;
        }
        if let Some(default_latitude) = self.default_latitude {
            ProcessingSettings::validate_default_latitude(default_latitude)
                .map_err(|e| e.to_string())?;
        }
        if let Some(max_dp_i) = self.max_dp_i {
            ProcessingSettings::validate_max_dp_i(max_dp_i).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("thin_tolerance must be >= 0, but got {0}")]
    InvalidThinTolerance(f64),
    #[error("default_latitude must be in [-90, 90], but got {0}")]
    InvalidDefaultLatitude(f64),
    #[error("max_dp_i must be > 0, but got {0}")]
    InvalidMaxDp(f64),
    #[error(transparent)]
    BuilderError(#[from] ProcessingSettingsBuilderError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
