// ssprs-profile/src/profile/insert.rs

use super::dicts::{Flag, Source};
use super::errors::ProfileError;
use super::profile::Profile;
use super::samples::{SampleRow, Samples};
use log::debug;

/// Where a new sample falls relative to the baseline samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertPosition {
    /// Shallower than every baseline sample.
    BeforeStart,
    /// Between the baseline samples at these array indices.
    Interior { above: usize, below: usize },
    /// Deeper than every baseline sample.
    AfterEnd,
}

/// What an insertion did to the sample arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A baseline sample already sat at the requested depth and was updated.
    Updated(usize),
    /// A new sample was inserted at `index`.
    Inserted {
        index: usize,
        position: InsertPosition,
    },
}

#[derive(Clone, Copy, Debug)]
enum Edit {
    Speed(f64),
    TempSal { temp: f64, sal: f64, speed: f64 },
}

#[derive(Clone, Copy, Debug)]
enum Plan {
    Update(usize),
    Insert {
        index: usize,
        position: InsertPosition,
        fit: (usize, usize),
    },
}

/// Value at `x` of the line through `(x0, y0)` and `(x1, y1)`.
fn line_at(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let dx = x1 - x0;
    if dx == 0.0 {
        return y0;
    }
    y0 + (y1 - y0) / dx * (x - x0)
}

fn plan(samples: &Samples, baseline: Flag, depth: f64) -> Result<Plan, ProfileError> {
    if !depth.is_finite() {
        return Err(ProfileError::InvalidDepth(depth));
    }
    let depths = samples.depth();
    let valid = samples.indices_with_flag(baseline);
    let k = valid.partition_point(|&i| depths[i] <= depth);
    if k > 0 && depths[valid[k - 1]] == depth {
        return Ok(Plan::Update(valid[k - 1]));
    }
    if valid.len() < 2 {
        return Err(ProfileError::NotEnoughValidSamples(
            "baseline",
            valid.len(),
            2,
        ));
    }

    let (position, fit) = if k == 0 {
        (InsertPosition::BeforeStart, (valid[0], valid[1]))
    } else if k == valid.len() {
        (InsertPosition::AfterEnd, (valid[k - 2], valid[k - 1]))
    } else {
        let (above, below) = (valid[k - 1], valid[k]);
        (InsertPosition::Interior { above, below }, (above, below))
    };

    // user-invalidated samples keep their place in the depth ordering
    let possible = samples.indices_where(|f| f == baseline || f == Flag::User);
    let j = possible.partition_point(|&i| depths[i] <= depth);
    let lo = if j == 0 { 0 } else { possible[j - 1] + 1 };
    let hi = possible.get(j).copied().unwrap_or(samples.num_samples());
    let index = (lo..hi).find(|&i| depths[i] > depth).unwrap_or(hi);
    Ok(Plan::Insert {
        index,
        position,
        fit,
    })
}

fn apply(
    samples: &mut Samples,
    baseline: Flag,
    depth: f64,
    edit: Edit,
    source: Source,
) -> Result<InsertOutcome, ProfileError> {
    match plan(samples, baseline, depth)? {
        Plan::Update(idx) => {
            let mut row = samples
                .row(idx)
                .ok_or(ProfileError::IndexOutOfRange(idx, samples.num_samples()))?;
            match edit {
                Edit::Speed(speed) => row.speed = speed,
                Edit::TempSal { temp, sal, speed } => {
                    row.temp = temp;
                    row.sal = sal;
                    row.speed = speed;
                }
            }
            row.source = source;
            row.flag = baseline;
            samples.set_row(idx, row)?;
            debug!("updated sample {} at depth {}", idx, depth);
            Ok(InsertOutcome::Updated(idx))
        }
        Plan::Insert {
            index,
            position,
            fit: (a, b),
        } => {
            let (ra, rb) = match (samples.row(a), samples.row(b)) {
                (Some(ra), Some(rb)) => (ra, rb),
                _ => return Err(ProfileError::IndexOutOfRange(a.max(b), samples.num_samples())),
            };
            let at = |ya: f64, yb: f64| line_at(ra.depth, ya, rb.depth, yb, depth);
            let mut row = SampleRow {
                pressure: at(ra.pressure, rb.pressure),
                depth,
                speed: at(ra.speed, rb.speed),
                temp: at(ra.temp, rb.temp),
                conductivity: at(ra.conductivity, rb.conductivity),
                sal: at(ra.sal, rb.sal),
                source,
                flag: baseline,
            };
            match edit {
                Edit::Speed(speed) => row.speed = speed,
                Edit::TempSal { temp, sal, speed } => {
                    row.temp = temp;
                    row.sal = sal;
                    row.speed = speed;
                }
            }
            samples.insert(index, row)?;
            debug!(
                "inserted sample at index {} ({:?}) for depth {}",
                index, position, depth
            );
            Ok(InsertOutcome::Inserted { index, position })
        }
    }
}

impl Profile {
    /// Set the sound speed at `depth` in `proc`.
    ///
    /// A valid sample already at `depth` is updated in place. Otherwise a new
    /// sample is inserted with pressure, temperature, conductivity and
    /// salinity taken from the line through the two nearest valid samples.
    pub fn insert_proc_speed(
        &mut self,
        depth: f64,
        speed: f64,
        source: Source,
    ) -> Result<InsertOutcome, ProfileError> {
        let outcome = apply(&mut self.proc, Flag::Valid, depth, Edit::Speed(speed), source)?;
        self.meta.append_proc_info("user_speed");
        self.meta.update_proc_time();
        Ok(outcome)
    }

    /// Set temperature and salinity at `depth` in `proc`, deriving the
    /// sound speed from them.
    pub fn insert_proc_temp_sal(
        &mut self,
        depth: f64,
        temp: f64,
        sal: f64,
    ) -> Result<InsertOutcome, ProfileError> {
        let lat = self.meta.latitude_or_default();
        let speed = self.domain.speed(depth, temp, sal, lat)?;
        let edit = Edit::TempSal { temp, sal, speed };
        let outcome = apply(&mut self.proc, Flag::Valid, depth, edit, Source::User)?;
        self.meta.append_proc_info("user_temp_sal");
        self.meta.update_proc_time();
        Ok(outcome)
    }

    /// Same as [`Profile::insert_proc_speed`] on `sis`, where the thinned
    /// samples form the baseline and the new sample is marked thinned.
    pub fn insert_sis_speed(
        &mut self,
        depth: f64,
        speed: f64,
        source: Source,
    ) -> Result<InsertOutcome, ProfileError> {
        let outcome = apply(&mut self.sis, Flag::Thin, depth, Edit::Speed(speed), source)?;
        self.meta.append_proc_info("sis_speed");
        self.meta.update_proc_time();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Profile {
        let mut profile = Profile::new();
        profile.proc = Samples::from_depth_speed(
            &[0.0, 10.0, 20.0, 30.0, 40.0],
            &[1500.0, 1501.0, 1502.0, 1503.0, 1504.0],
        );
        profile
    }

    #[test]
    fn test_insert_interior() {
        let mut profile = ramp();
        let outcome = profile.insert_proc_speed(15.0, 1501.5, Source::User).unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::Inserted {
                index: 2,
                position: InsertPosition::Interior { above: 1, below: 2 }
            }
        );
        assert_eq!(
            profile.proc.depth().to_vec(),
            vec![0.0, 10.0, 15.0, 20.0, 30.0, 40.0]
        );
        assert_eq!(
            profile.proc.speed().to_vec(),
            vec![1500.0, 1501.0, 1501.5, 1502.0, 1503.0, 1504.0]
        );
        assert_eq!(profile.proc.flag()[2], Flag::Valid);
        assert_eq!(profile.proc.source()[2], Source::User);
        assert!(profile.proc.is_consistent());
    }

    #[test]
    fn test_insert_at_existing_depth_is_idempotent() {
        let mut profile = ramp();
        profile.insert_proc_speed(15.0, 1501.5, Source::User).unwrap();
        let before = profile.proc.clone();
        let outcome = profile.insert_proc_speed(15.0, 1501.5, Source::User).unwrap();
        assert_eq!(outcome, InsertOutcome::Updated(2));
        assert_eq!(profile.proc, before);
        assert_eq!(profile.proc.num_samples(), 6);
    }

    #[test]
    fn test_insert_extrapolates_at_ends() {
        let mut profile = ramp();
        profile.proc.temp_mut().assign(&ndarray::arr1(&[20.0, 18.0, 16.0, 14.0, 12.0]));

        let outcome = profile.insert_proc_speed(50.0, 1505.0, Source::User).unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::Inserted {
                index: 5,
                position: InsertPosition::AfterEnd
            }
        );
        assert!((profile.proc.temp()[5] - 10.0).abs() < 1e-12);

        profile.proc.depth_mut()[0] = 2.0;
        let outcome = profile.insert_proc_speed(1.0, 1499.0, Source::User).unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::Inserted {
                index: 0,
                position: InsertPosition::BeforeStart
            }
        );
        // line through (2, 20) and (10, 18)
        assert!((profile.proc.temp()[0] - 20.25).abs() < 1e-12);
    }

    #[test]
    fn test_insert_keeps_user_invalidated_order() {
        let mut profile = ramp();
        profile.proc.flag_mut()[2] = Flag::User;
        let outcome = profile.insert_proc_speed(25.0, 1502.4, Source::User).unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::Inserted {
                index: 3,
                position: InsertPosition::Interior { above: 1, below: 3 }
            }
        );
        assert_eq!(
            profile.proc.depth().to_vec(),
            vec![0.0, 10.0, 20.0, 25.0, 30.0, 40.0]
        );
    }

    #[test]
    fn test_insert_temp_sal_computes_speed() {
        let mut profile = ramp();
        profile.insert_proc_temp_sal(10.0, 10.0, 35.0).unwrap();
        let expected = crate::oceanography::speed(10.0, 10.0, 35.0, 30.0);
        assert_eq!(profile.proc.speed()[1], expected);
        assert_eq!(profile.proc.sal()[1], 35.0);
        assert_eq!(profile.proc.num_samples(), 5);
        assert!(profile.meta.proc_info().contains("user_temp_sal"));
    }

    #[test]
    fn test_insert_sis_uses_thinned_baseline() {
        let mut profile = ramp();
        profile.clone_proc_to_sis();
        profile.sis.flag_mut().assign(&ndarray::arr1(&[
            Flag::Thin,
            Flag::Valid,
            Flag::Valid,
            Flag::Valid,
            Flag::Thin,
        ]));
        let outcome = profile.insert_sis_speed(25.0, 1510.0, Source::User).unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::Inserted {
                index: 3,
                position: InsertPosition::Interior { above: 0, below: 4 }
            }
        );
        assert_eq!(profile.sis.flag()[3], Flag::Thin);
        assert_eq!(profile.sis.speed()[3], 1510.0);
        assert_eq!(profile.proc.num_samples(), 5);
    }

    #[test]
    fn test_insert_rejects_bad_input() {
        let mut profile = ramp();
        assert!(matches!(
            profile.insert_proc_speed(f64::NAN, 1500.0, Source::User),
            Err(ProfileError::InvalidDepth(_))
        ));
        let mut empty = Profile::new();
        assert!(matches!(
            empty.insert_proc_speed(5.0, 1500.0, Source::User),
            Err(ProfileError::NotEnoughValidSamples(_, 0, 2))
        ));
    }
}
