// ssprs-profile/src/profile/profile.rs

use super::dicts::{Direction, Flag};
use super::errors::ProfileError;
use super::metadata::Metadata;
use super::samples::Samples;
use crate::dyn_height::depth_from_pressure;
use crate::interp::linear_interp;
use crate::oceanography::{self, DomainCheck};
use log::{debug, info};
use ndarray::Array1;
use ndarray_stats::QuantileExt;

/// One cast: metadata plus its raw, processed and sonar-export samples.
///
/// `data` holds the samples as read. `proc` is a filtered copy of `data`
/// that receives every user edit. `sis` is a copy of `proc` shaped for
/// transmission to the acquisition system. Copies only flow
/// `data -> proc -> sis`.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    pub meta: Metadata,
    pub data: Samples,
    pub proc: Samples,
    pub sis: Samples,
    pub domain: DomainCheck,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init_data(&mut self, num_samples: usize) {
        self.data = Samples::init(num_samples);
    }

    pub fn init_proc(&mut self, num_samples: usize) {
        self.proc = Samples::init(num_samples);
    }

    pub fn init_sis(&mut self, num_samples: usize) {
        self.sis = Samples::init(num_samples);
    }

    /// Flag the `data` samples acquired in the discarded direction.
    ///
    /// The turning point is the first sample at maximum depth, ignoring
    /// missing (non-finite) depths, and always stays valid. Samples already invalidated by the user keep their flag,
    /// and flags from a previous reduction are cleared first.
    pub fn reduce_up_down(&mut self, direction: Direction) -> Result<(), ProfileError> {
        if self.data.is_empty() {
            debug!("no data samples, skipping direction reduction");
            return Ok(());
        }
        let depth = self.data.depth();
        let finite: Vec<usize> = (0..depth.len()).filter(|&i| depth[i].is_finite()).collect();
        if finite.is_empty() {
            return Err(ProfileError::NotEnoughValidSamples("data", 0, 1));
        }
        let finite_depth: Array1<f64> = finite.iter().map(|&i| depth[i]).collect();
        let turning_point = finite[finite_depth.argmax()?];
        debug!(
            "turning point at sample {} of {}",
            turning_point,
            self.data.num_samples()
        );

        let mut excluded = 0;
        for (i, flag) in self.data.flag_mut().iter_mut().enumerate() {
            if *flag == Flag::Direction {
                *flag = Flag::Valid;
            }
            let wrong_direction = match direction {
                Direction::Down => i > turning_point,
                Direction::Up => i < turning_point,
            };
            if wrong_direction && *flag == Flag::Valid {
                *flag = Flag::Direction;
                excluded += 1;
            }
        }
        info!(
            "Direction reduction ({}) excluded {} samples",
            direction, excluded
        );
        self.meta.append_proc_info(&format!("direction_{}", direction));
        self.meta.update_proc_time();
        Ok(())
    }

    /// Replace `proc` with the valid samples of `data`.
    pub fn clone_data_to_proc(&mut self) -> Result<(), ProfileError> {
        let valid = self.data.indices_with_flag(Flag::Valid);
        self.proc = self.data.select(&valid)?;
        self.meta.update_proc_time();
        debug!(
            "cloned {} of {} data samples to proc",
            self.proc.num_samples(),
            self.data.num_samples()
        );
        Ok(())
    }

    /// Replace `sis` with a copy of `proc`.
    pub fn clone_proc_to_sis(&mut self) {
        self.sis = self.proc.clone();
        self.meta.update_proc_time();
        debug!("cloned {} proc samples to sis", self.sis.num_samples());
    }

    /// Discard every edit: `proc` becomes a fresh copy of `data` and `sis`
    /// is emptied.
    pub fn restart_proc(&mut self) -> Result<(), ProfileError> {
        self.clone_data_to_proc()?;
        self.sis = Samples::default();
        info!("Processing restarted from {} raw samples", self.data.num_samples());
        Ok(())
    }

    /// Depth of every `data` sample from its pressure.
    pub fn calc_data_depth(&mut self) {
        let lat = self.meta.latitude_or_default();
        let depth = oceanography::p2d_array(&self.data.pressure(), lat);
        self.data.depth_mut().assign(&depth);
        self.meta.append_proc_info("depth_from_pressure");
        self.meta.update_proc_time();
    }

    /// Depth of the valid `data` samples from pressure, temperature and
    /// salinity through the dynamic height anomaly. Other samples get the
    /// standard-ocean depth. Valid pressures must be strictly increasing.
    pub fn calc_data_depth_dyn_height(&mut self, max_dp_i: f64) -> Result<(), ProfileError> {
        let valid = self.data.indices_with_flag(Flag::Valid);
        if valid.len() < 2 {
            return Err(ProfileError::NotEnoughValidSamples("data", valid.len(), 2));
        }
        let lat = self.meta.latitude_or_default();
        let pressure = self.data.pressure();
        let p: Array1<f64> = valid.iter().map(|&i| pressure[i]).collect();
        let sa: Array1<f64> = valid.iter().map(|&i| self.data.sal()[i]).collect();
        let ct: Array1<f64> = valid.iter().map(|&i| self.data.temp()[i]).collect();
        let valid_depth = depth_from_pressure(&sa, &ct, &p, lat, max_dp_i)?;

        let mut depth = oceanography::p2d_array(&pressure, lat);
        for (k, &i) in valid.iter().enumerate() {
            depth[i] = valid_depth[k];
        }
        self.data.depth_mut().assign(&depth);
        self.meta.append_proc_info("depth_from_dyn_height");
        self.meta.update_proc_time();
        Ok(())
    }

    /// Recompute `proc` sound speed from depth, temperature and salinity.
    pub fn calc_proc_speed(&mut self) -> Result<(), ProfileError> {
        if self.proc.is_empty() {
            return Err(ProfileError::EmptySamples("proc"));
        }
        let lat = self.meta.latitude_or_default();
        let (depth, temp, sal) = (self.proc.depth(), self.proc.temp(), self.proc.sal());
        let speed = (0..self.proc.num_samples())
            .map(|i| self.domain.speed(depth[i], temp[i], sal[i], lat))
            .collect::<Result<Array1<f64>, _>>()?;
        self.proc.speed_mut().assign(&speed);
        self.meta.append_proc_info("calc_speed");
        self.meta.update_proc_time();
        Ok(())
    }

    /// Recompute `proc` salinity by inverting the sound speed equation.
    pub fn calc_proc_salinity(&mut self) -> Result<(), ProfileError> {
        if self.proc.is_empty() {
            return Err(ProfileError::EmptySamples("proc"));
        }
        let lat = self.meta.latitude_or_default();
        let (depth, speed, temp) = (self.proc.depth(), self.proc.speed(), self.proc.temp());
        let sal = (0..self.proc.num_samples())
            .map(|i| self.domain.sal(depth[i], speed[i], temp[i], lat))
            .collect::<Result<Array1<f64>, _>>()?;
        self.proc.sal_mut().assign(&sal);
        self.meta.append_proc_info("calc_salinity");
        self.meta.update_proc_time();
        Ok(())
    }

    /// Replace `proc` salinity with the salinity of `reference` (typically an
    /// atlas profile) interpolated at each depth, then recompute speed.
    pub fn replace_proc_sal(&mut self, reference: &Profile) -> Result<(), ProfileError> {
        if self.proc.is_empty() {
            return Err(ProfileError::EmptySamples("proc"));
        }
        let mut pairs: Vec<(f64, f64)> = reference
            .proc
            .indices_with_flag(Flag::Valid)
            .into_iter()
            .map(|i| (reference.proc.depth()[i], reference.proc.sal()[i]))
            .filter(|(d, s)| d.is_finite() && s.is_finite())
            .collect();
        if pairs.is_empty() {
            return Err(ProfileError::NotEnoughValidSamples("reference", 0, 1));
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs.dedup_by(|a, b| a.0 == b.0);
        let (ref_depth, ref_sal): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

        let lat = self.meta.latitude_or_default();
        let depth = self.proc.depth().to_vec();
        let sal = linear_interp(&ref_depth, &ref_sal, &depth);
        let temp = self.proc.temp();
        let speed = (0..depth.len())
            .map(|i| self.domain.speed(depth[i], temp[i], sal[i], lat))
            .collect::<Result<Array1<f64>, _>>()?;
        self.proc.sal_mut().assign(&sal);
        self.proc.speed_mut().assign(&speed);
        self.meta.append_proc_info("ref_salinity");
        self.meta.update_proc_time();
        Ok(())
    }

    /// Flag valid `proc` samples with depth in `[depth_min, depth_max]` as
    /// user-invalidated. Returns the number of samples flagged.
    pub fn proc_invalidate(&mut self, depth_min: f64, depth_max: f64) -> usize {
        let depth = self.proc.depth().to_owned();
        let mut count = 0;
        for (i, flag) in self.proc.flag_mut().iter_mut().enumerate() {
            if *flag == Flag::Valid && depth[i] >= depth_min && depth[i] <= depth_max {
                *flag = Flag::User;
                count += 1;
            }
        }
        if count > 0 {
            self.meta.append_proc_info("user_invalid");
            self.meta.update_proc_time();
        }
        count
    }

    pub fn proc_valid_indices(&self) -> Vec<usize> {
        self.proc.indices_with_flag(Flag::Valid)
    }

    pub fn sis_thinned_indices(&self) -> Vec<usize> {
        self.sis.indices_with_flag(Flag::Thin)
    }

    /// Index and depth of the deepest valid `proc` sample (first one on ties).
    pub fn proc_max_valid_depth(&self) -> Option<(usize, f64)> {
        let depth = self.proc.depth();
        self.proc_valid_indices()
            .into_iter()
            .filter(|&i| depth[i].is_finite())
            .fold(None, |best, i| match best {
                Some((_, d)) if depth[i] <= d => best,
                _ => Some((i, depth[i])),
            })
    }

    /// Samples a writer should export: the thinned `sis` samples when
    /// thinning has run, the valid `proc` samples otherwise.
    pub fn export_samples(&self) -> Result<Samples, ProfileError> {
        let thinned = self.sis_thinned_indices();
        if !thinned.is_empty() {
            return self.sis.select(&thinned);
        }
        let valid = self.proc_valid_indices();
        if valid.is_empty() {
            return Err(ProfileError::EmptySamples("proc"));
        }
        self.proc.select(&valid)
    }
}
