// ssprs-profile/src/profile/extend.rs

use super::dicts::{Flag, Source};
use super::errors::ProfileError;
use super::profile::Profile;
use log::{debug, info};

/// Result of [`Profile::extend_profile`] when no error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// `added` samples from the extender were appended below the cast.
    Extended { added: usize },
    /// The extender does not reach below the deepest valid sample.
    NoExtension,
}

impl Profile {
    /// Splice the deeper part of `extender` below the deepest valid `proc`
    /// sample.
    ///
    /// Everything in `proc` past the deepest valid sample is dropped, and
    /// the appended samples carry `extension_type` as their source.
    pub fn extend_profile(
        &mut self,
        extender: &Profile,
        extension_type: Source,
    ) -> Result<ExtensionOutcome, ProfileError> {
        Self::validate_extender(extender)?;
        let (max_idx, max_depth) = self
            .proc_max_valid_depth()
            .ok_or(ProfileError::EmptySamples("proc"))?;

        let ext_depth = extender.proc.depth();
        let deeper: Vec<usize> = extender
            .proc
            .indices_with_flag(Flag::Valid)
            .into_iter()
            .filter(|&i| ext_depth[i] > max_depth)
            .collect();
        if deeper.is_empty() {
            info!(
                "Extender does not reach below {} m, no extension applied",
                max_depth
            );
            return Ok(ExtensionOutcome::NoExtension);
        }

        let mut extended = self.proc.clone();
        extended.truncate(max_idx + 1);
        extended.append_from(&extender.proc, &deeper, extension_type)?;
        debug!(
            "extension from {} m to {} m",
            max_depth,
            ext_depth[deeper[deeper.len() - 1]]
        );
        self.proc = extended;
        self.meta
            .append_proc_info(&format!("ext_{}", extension_type));
        self.meta.update_proc_time();
        info!("Extended with {} {} samples", deeper.len(), extension_type);
        Ok(ExtensionOutcome::Extended {
            added: deeper.len(),
        })
    }

    fn validate_extender(extender: &Profile) -> Result<(), ProfileError> {
        if extender.proc.is_empty() {
            return Err(ProfileError::InvalidExtender(
                "no processed samples".to_string(),
            ));
        }
        let depth = extender.proc.depth();
        let speed = extender.proc.speed();
        for i in extender.proc.indices_with_flag(Flag::Valid) {
            if !depth[i].is_finite() || !speed[i].is_finite() {
                return Err(ProfileError::InvalidExtender(format!(
                    "non-finite sample at index {}",
                    i
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::samples::Samples;

    fn cast(depth: &[f64], speed: &[f64]) -> Profile {
        let mut profile = Profile::new();
        profile.proc = Samples::from_depth_speed(depth, speed);
        profile
    }

    #[test]
    fn test_extend_appends_deeper_samples() {
        crate::setup_pretty_env_logger_default();
        let mut profile = cast(&[0.0, 10.0, 20.0, 15.0], &[1500.0, 1501.0, 1502.0, 1490.0]);
        profile.proc.flag_mut()[3] = Flag::User;
        let atlas = cast(
            &[0.0, 10.0, 50.0, 100.0],
            &[1495.0, 1496.0, 1497.0, 1498.0],
        );
        let outcome = profile.extend_profile(&atlas, Source::Woa09).unwrap();
        assert_eq!(outcome, ExtensionOutcome::Extended { added: 2 });
        assert_eq!(
            profile.proc.depth().to_vec(),
            vec![0.0, 10.0, 20.0, 50.0, 100.0]
        );
        assert_eq!(profile.proc.source()[3], Source::Woa09);
        assert_eq!(profile.proc.flag()[4], Flag::Valid);
        assert!(profile.proc.is_consistent());
        assert!(profile.meta.proc_info().contains("ext_woa09"));
    }

    #[test]
    fn test_shallow_extender_is_noop() {
        let mut profile = cast(&[0.0, 100.0], &[1500.0, 1490.0]);
        let before = profile.proc.clone();
        let shallow = cast(&[0.0, 50.0], &[1500.0, 1495.0]);
        let outcome = profile.extend_profile(&shallow, Source::Ref).unwrap();
        assert_eq!(outcome, ExtensionOutcome::NoExtension);
        assert_eq!(profile.proc, before);
        assert_eq!(profile.meta.proc_info(), "");
    }

    #[test]
    fn test_malformed_extender_fails() {
        let mut profile = cast(&[0.0, 100.0], &[1500.0, 1490.0]);
        let empty = Profile::new();
        assert!(matches!(
            profile.extend_profile(&empty, Source::Ref),
            Err(ProfileError::InvalidExtender(_))
        ));
        let broken = cast(&[0.0, f64::NAN], &[1500.0, 1495.0]);
        assert!(matches!(
            profile.extend_profile(&broken, Source::Ref),
            Err(ProfileError::InvalidExtender(_))
        ));
        assert_eq!(profile.proc.num_samples(), 2);
    }
}
