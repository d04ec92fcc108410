// ssprs-profile/src/profile/samples.rs

use super::dicts::{Flag, Source};
use super::errors::ProfileError;
use ndarray::{s, Array1, ArrayView1, ArrayViewMut1};
use std::iter;

/// One sample across all parallel arrays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRow {
    pub pressure: f64,
    pub depth: f64,
    pub speed: f64,
    pub temp: f64,
    pub conductivity: f64,
    pub sal: f64,
    pub source: Source,
    pub flag: Flag,
}

impl Default for SampleRow {
    fn default() -> Self {
        Self {
            pressure: 0.0,
            depth: 0.0,
            speed: 0.0,
            temp: 0.0,
            conductivity: 0.0,
            sal: 0.0,
            source: Source::Raw,
            flag: Flag::Valid,
        }
    }
}

/// Struct-of-arrays for one acquisition pass.
///
/// All eight arrays always share the same length. Element access goes
/// through views so that no single array can be resized on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct Samples {
    num_samples: usize,
    pressure: Array1<f64>,
    depth: Array1<f64>,
    speed: Array1<f64>,
    temp: Array1<f64>,
    conductivity: Array1<f64>,
    sal: Array1<f64>,
    source: Array1<Source>,
    flag: Array1<Flag>,
}

impl Default for Samples {
    fn default() -> Self {
        Self::init(0)
    }
}

fn insert_value<T: Clone>(a: &Array1<T>, idx: usize, value: T) -> Array1<T> {
    a.iter()
        .take(idx)
        .cloned()
        .chain(iter::once(value))
        .chain(a.iter().skip(idx).cloned())
        .collect()
}

fn resize_array<T: Clone>(a: &Array1<T>, n: usize, fill: T) -> Array1<T> {
    a.iter()
        .take(n)
        .cloned()
        .chain(iter::repeat(fill).take(n.saturating_sub(a.len())))
        .collect()
}

impl Samples {
    /// Zero-filled samples with `Source::Raw` and `Flag::Valid`.
    pub fn init(num_samples: usize) -> Self {
        Self {
            num_samples,
            pressure: Array1::zeros(num_samples),
            depth: Array1::zeros(num_samples),
            speed: Array1::zeros(num_samples),
            temp: Array1::zeros(num_samples),
            conductivity: Array1::zeros(num_samples),
            sal: Array1::zeros(num_samples),
            source: Array1::from_elem(num_samples, Source::Raw),
            flag: Array1::from_elem(num_samples, Flag::Valid),
        }
    }

    pub fn from_rows(rows: &[SampleRow]) -> Self {
        Self {
            num_samples: rows.len(),
            pressure: rows.iter().map(|r| r.pressure).collect(),
            depth: rows.iter().map(|r| r.depth).collect(),
            speed: rows.iter().map(|r| r.speed).collect(),
            temp: rows.iter().map(|r| r.temp).collect(),
            conductivity: rows.iter().map(|r| r.conductivity).collect(),
            sal: rows.iter().map(|r| r.sal).collect(),
            source: rows.iter().map(|r| r.source).collect(),
            flag: rows.iter().map(|r| r.flag).collect(),
        }
    }

    /// Samples carrying only depth and speed, everything else zeroed.
    pub fn from_depth_speed(depth: &[f64], speed: &[f64]) -> Self {
        let rows: Vec<SampleRow> = depth
            .iter()
            .zip(speed.iter())
            .map(|(&depth, &speed)| SampleRow {
                depth,
                speed,
                ..SampleRow::default()
            })
            .collect();
        Self::from_rows(&rows)
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn len(&self) -> usize {
        self.num_samples
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    pub fn pressure(&self) -> ArrayView1<'_, f64> {
        self.pressure.view()
    }
    pub fn depth(&self) -> ArrayView1<'_, f64> {
        self.depth.view()
    }
    pub fn speed(&self) -> ArrayView1<'_, f64> {
        self.speed.view()
    }
    pub fn temp(&self) -> ArrayView1<'_, f64> {
        self.temp.view()
    }
    pub fn conductivity(&self) -> ArrayView1<'_, f64> {
        self.conductivity.view()
    }
    pub fn sal(&self) -> ArrayView1<'_, f64> {
        self.sal.view()
    }
    pub fn source(&self) -> ArrayView1<'_, Source> {
        self.source.view()
    }
    pub fn flag(&self) -> ArrayView1<'_, Flag> {
        self.flag.view()
    }

    pub fn pressure_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.pressure.view_mut()
    }
    pub fn depth_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.depth.view_mut()
    }
    pub fn speed_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.speed.view_mut()
    }
    pub fn temp_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.temp.view_mut()
    }
    pub fn conductivity_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.conductivity.view_mut()
    }
    pub fn sal_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.sal.view_mut()
    }
    pub fn source_mut(&mut self) -> ArrayViewMut1<'_, Source> {
        self.source.view_mut()
    }
    pub fn flag_mut(&mut self) -> ArrayViewMut1<'_, Flag> {
        self.flag.view_mut()
    }

    pub fn row(&self, idx: usize) -> Option<SampleRow> {
        if idx >= self.num_samples {
            return None;
        }
        Some(SampleRow {
            pressure: self.pressure[idx],
            depth: self.depth[idx],
            speed: self.speed[idx],
            temp: self.temp[idx],
            conductivity: self.conductivity[idx],
            sal: self.sal[idx],
            source: self.source[idx],
            flag: self.flag[idx],
        })
    }

    pub fn set_row(&mut self, idx: usize, row: SampleRow) -> Result<(), ProfileError> {
        if idx >= self.num_samples {
            return Err(ProfileError::IndexOutOfRange(idx, self.num_samples));
        }
        self.pressure[idx] = row.pressure;
        self.depth[idx] = row.depth;
        self.speed[idx] = row.speed;
        self.temp[idx] = row.temp;
        self.conductivity[idx] = row.conductivity;
        self.sal[idx] = row.sal;
        self.source[idx] = row.source;
        self.flag[idx] = row.flag;
        Ok(())
    }

    /// Insert a sample before `idx` in every array.
    pub fn insert(&mut self, idx: usize, row: SampleRow) -> Result<(), ProfileError> {
        if idx > self.num_samples {
            return Err(ProfileError::IndexOutOfRange(idx, self.num_samples));
        }
        self.pressure = insert_value(&self.pressure, idx, row.pressure);
        self.depth = insert_value(&self.depth, idx, row.depth);
        self.speed = insert_value(&self.speed, idx, row.speed);
        self.temp = insert_value(&self.temp, idx, row.temp);
        self.conductivity = insert_value(&self.conductivity, idx, row.conductivity);
        self.sal = insert_value(&self.sal, idx, row.sal);
        self.source = insert_value(&self.source, idx, row.source);
        self.flag = insert_value(&self.flag, idx, row.flag);
        self.num_samples += 1;
        Ok(())
    }

    /// Truncate or zero-extend every array to `num_samples`.
    pub fn resize(&mut self, num_samples: usize) {
        self.pressure = resize_array(&self.pressure, num_samples, 0.0);
        self.depth = resize_array(&self.depth, num_samples, 0.0);
        self.speed = resize_array(&self.speed, num_samples, 0.0);
        self.temp = resize_array(&self.temp, num_samples, 0.0);
        self.conductivity = resize_array(&self.conductivity, num_samples, 0.0);
        self.sal = resize_array(&self.sal, num_samples, 0.0);
        self.source = resize_array(&self.source, num_samples, Source::Raw);
        self.flag = resize_array(&self.flag, num_samples, Flag::Valid);
        self.num_samples = num_samples;
    }

    pub fn truncate(&mut self, num_samples: usize) {
        if num_samples >= self.num_samples {
            return;
        }
        self.pressure = self.pressure.slice(s![..num_samples]).to_owned();
        self.depth = self.depth.slice(s![..num_samples]).to_owned();
        self.speed = self.speed.slice(s![..num_samples]).to_owned();
        self.temp = self.temp.slice(s![..num_samples]).to_owned();
        self.conductivity = self.conductivity.slice(s![..num_samples]).to_owned();
        self.sal = self.sal.slice(s![..num_samples]).to_owned();
        self.source = self.source.slice(s![..num_samples]).to_owned();
        self.flag = self.flag.slice(s![..num_samples]).to_owned();
        self.num_samples = num_samples;
    }

    /// Copy of the samples at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Samples, ProfileError> {
        let rows = indices
            .iter()
            .map(|&i| {
                self.row(i)
                    .ok_or(ProfileError::IndexOutOfRange(i, self.num_samples))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rows(&rows))
    }

    /// Append the samples of `other` at `indices`, tagging them with `source`
    /// and marking them valid.
    pub fn append_from(
        &mut self,
        other: &Samples,
        indices: &[usize],
        source: Source,
    ) -> Result<(), ProfileError> {
        let mut tail = other.select(indices)?;
        tail.source = Array1::from_elem(tail.num_samples, source);
        tail.flag = Array1::from_elem(tail.num_samples, Flag::Valid);
        let mut rows: Vec<SampleRow> = (0..self.num_samples).filter_map(|i| self.row(i)).collect();
        rows.extend((0..tail.num_samples).filter_map(|i| tail.row(i)));
        *self = Self::from_rows(&rows);
        Ok(())
    }

    pub fn indices_with_flag(&self, flag: Flag) -> Vec<usize> {
        self.indices_where(|f| f == flag)
    }

    pub fn indices_where<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(Flag) -> bool,
    {
        self.flag
            .iter()
            .enumerate()
            .filter(|(_, &f)| predicate(f))
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether the arrays agree with `num_samples`.
    pub fn is_consistent(&self) -> bool {
        let n = self.num_samples;
        [
            self.pressure.len(),
            self.depth.len(),
            self.speed.len(),
            self.temp.len(),
            self.conductivity.len(),
            self.sal.len(),
            self.source.len(),
            self.flag.len(),
        ]
        .iter()
        .all(|&len| len == n)
    }
}
