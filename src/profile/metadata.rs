// ssprs-profile/src/profile/metadata.rs

use super::dicts::{ProbeType, SensorType};
use super::errors::ProfileError;
use crate::oceanography::DEFAULT_LATITUDE;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Descriptive fields of one cast.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub sensor_type: SensorType,
    pub probe_type: ProbeType,
    latitude: Option<f64>,
    longitude: Option<f64>,
    pub utc_time: Option<DateTime<Utc>>,
    pub original_path: PathBuf,
    pub project: String,
    pub survey: String,
    pub vessel: String,
    pub sn: String,
    proc_time: Option<DateTime<Utc>>,
    proc_info: String,
}

impl Metadata {
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Latitude for the equations, falling back to 30°.
    pub fn latitude_or_default(&self) -> f64 {
        self.latitude.unwrap_or(DEFAULT_LATITUDE)
    }

    pub fn set_position(&mut self, latitude: f64, longitude: f64) -> Result<(), ProfileError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ProfileError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ProfileError::InvalidLongitude(longitude));
        }
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        Ok(())
    }

    pub fn clear_position(&mut self) {
        self.latitude = None;
        self.longitude = None;
    }

    pub fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    pub fn proc_time(&self) -> Option<DateTime<Utc>> {
        self.proc_time
    }

    pub fn update_proc_time(&mut self) {
        self.proc_time = Some(Utc::now());
    }

    /// Semicolon-joined processing tags, in the order first applied.
    pub fn proc_info(&self) -> &str {
        &self.proc_info
    }

    pub fn proc_info_tags(&self) -> impl Iterator<Item = &str> {
        self.proc_info.split(';').filter(|tag| !tag.is_empty())
    }

    /// Record a processing tag; repeated tags are kept once.
    pub fn append_proc_info(&mut self, tag: &str) {
        if self.proc_info_tags().any(|existing| existing == tag) {
            return;
        }
        if !self.proc_info.is_empty() {
            self.proc_info.push(';');
        }
        self.proc_info.push_str(tag);
    }

    /// Whether the cast can be stored in a project database.
    pub fn is_storable(&self) -> bool {
        self.has_position() && self.utc_time.is_some()
    }

    pub fn require_position_and_time(&self) -> Result<(), ProfileError> {
        if !self.has_position() {
            return Err(ProfileError::MissingMetadata("position"));
        }
        if self.utc_time.is_none() {
            return Err(ProfileError::MissingMetadata("utc_time"));
        }
        Ok(())
    }
}
