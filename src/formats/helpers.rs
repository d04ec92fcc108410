// ssprs-profile/src/formats/helpers.rs

use super::callbacks::Callbacks;
use super::errors::FormatError;
use crate::profile::{Profile, ProfileList};
use crate::settings::ProcessingSettings;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Lines of a text file, decoded as UTF-8 or, failing that, Latin-1.
pub fn read_text_lines(path: &Path) -> Result<Vec<String>, FormatError> {
    let bytes = fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("{} is not UTF-8, decoding as Latin-1", path.display());
            e.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    };
    Ok(text.lines().map(str::to_string).collect())
}

pub fn read_binary(path: &Path) -> Result<Vec<u8>, FormatError> {
    Ok(fs::read(path)?)
}

/// Common post-read step: fill missing position and time through
/// `callbacks`, record where the cast came from and apply the domain
/// check mode.
pub fn finalize_profiles(
    profiles: &mut ProfileList,
    path: &Path,
    settings: &ProcessingSettings,
    callbacks: &mut dyn Callbacks,
) -> Result<(), FormatError> {
    if profiles.is_empty() {
        return Err(FormatError::NoProfiles(path.to_path_buf()));
    }
    for profile in profiles.iter_mut() {
        finalize_profile(profile, path, settings, callbacks)?;
    }
    Ok(())
}

fn finalize_profile(
    profile: &mut Profile,
    path: &Path,
    settings: &ProcessingSettings,
    callbacks: &mut dyn Callbacks,
) -> Result<(), FormatError> {
    profile.meta.original_path = path.to_path_buf();
    profile.domain = settings.domain_check();
    if !profile.meta.has_position() {
        match callbacks.ask_location() {
            Some((lat, lon)) => profile.meta.set_position(lat, lon)?,
            None => warn!("{}: cast has no position", path.display()),
        }
    }
    if profile.meta.utc_time.is_none() {
        profile.meta.utc_time = callbacks.ask_date();
        if profile.meta.utc_time.is_none() {
            warn!("{}: cast has no timestamp", path.display());
        }
    }
    Ok(())
}
