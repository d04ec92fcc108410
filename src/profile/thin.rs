// ssprs-profile/src/profile/thin.rs

use super::dicts::Flag;
use super::errors::ProfileError;
use super::profile::Profile;
use humantime::format_duration;
use log::{debug, info};
use std::time::Instant;

/// Douglas-Peucker over `(x, y)` with vertical distance to the chord.
/// Returns a keep mask; the first and last points are always kept.
fn douglas_peucker(x: &[f64], y: &[f64], tolerance: f64) -> Vec<bool> {
    let n = x.len();
    let mut keep = vec![false; n];
    if n == 0 {
        return keep;
    }
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let dx = x[end] - x[start];
        let slope = if dx == 0.0 {
            0.0
        } else {
            (y[end] - y[start]) / dx
        };
        let (max_idx, max_dev) = (start + 1..end)
            .map(|i| (i, (y[start] + slope * (x[i] - x[start]) - y[i]).abs()))
            .fold((start, f64::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 {
                    cur
                } else {
                    best
                }
            });
        if max_dev <= tolerance {
            continue;
        }
        keep[max_idx] = true;
        stack.push((max_idx, end));
        stack.push((start, max_idx));
    }
    keep
}

impl Profile {
    /// Mark the `sis` samples needed to reproduce the speed curve within
    /// `tolerance` (m/s) as thinned. Nothing is removed. Returns the number
    /// of kept samples.
    pub fn thin(&mut self, tolerance: f64) -> Result<usize, ProfileError> {
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(ProfileError::InvalidTolerance(tolerance));
        }
        let now = Instant::now();
        let candidates = self.sis.indices_where(|f| f == Flag::Valid || f == Flag::Thin);
        if candidates.len() < 2 {
            return Err(ProfileError::NotEnoughValidSamples(
                "sis",
                candidates.len(),
                2,
            ));
        }
        let depth: Vec<f64> = candidates.iter().map(|&i| self.sis.depth()[i]).collect();
        let speed: Vec<f64> = candidates.iter().map(|&i| self.sis.speed()[i]).collect();
        let keep = douglas_peucker(&depth, &speed, tolerance);

        let mut flags = self.sis.flag_mut();
        for (k, &i) in candidates.iter().enumerate() {
            flags[i] = if keep[k] { Flag::Thin } else { Flag::Valid };
        }
        let kept = keep.iter().filter(|&&k| k).count();
        debug!("thinning took {}", format_duration(now.elapsed()));
        info!(
            "Thinned sis from {} to {} samples (tolerance {} m/s)",
            candidates.len(),
            kept,
            tolerance
        );
        self.meta.append_proc_info("thinned");
        self.meta.update_proc_time();
        Ok(kept)
    }
}
