// ssprs-profile/src/dyn_height/integrator.rs

use super::errors::DynHeightError;
use super::specvol::specvol_anom;
use crate::interp::pchip_interp;
use crate::oceanography;
use humantime::format_duration;
use log::{debug, info, trace};
use ndarray::Array1;
use std::time::Instant;

/// dbar -> Pa
const DB2PA: f64 = 1.0e4;

/// Default maximum pressure step of the refined integration grid (dbar).
pub const DEFAULT_MAX_DP_I: f64 = 1.0;
/// Deepest sea pressure accepted (dbar), below the deepest trench.
pub const MAX_SEA_PRESSURE: f64 = 12000.0;
const MAX_GRID_NODES: usize = 2_000_000;

/// Geostrophic dynamic height anomaly of a cast.
#[derive(Debug, Clone)]
pub struct DynamicHeight {
    values: Array1<f64>,
    p_ref: f64,
    refined: bool,
}

impl DynamicHeight {
    /// Dynamic height anomaly (m²/s²) at each input sample.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    pub fn p_ref(&self) -> f64 {
        self.p_ref
    }

    /// Whether the integration ran on an interpolated grid.
    pub fn refined(&self) -> bool {
        self.refined
    }
}

#[derive(Default)]
pub struct DynHeightBuilder<'a> {
    sa: Option<&'a Array1<f64>>,
    ct: Option<&'a Array1<f64>>,
    p: Option<&'a Array1<f64>>,
    p_ref: Option<f64>,
    max_dp_i: Option<f64>,
}

impl<'a> DynHeightBuilder<'a> {
    pub fn build(&self) -> Result<DynamicHeight, DynHeightError> {
        let sa = self
            .sa
            .ok_or_else(|| DynHeightError::UninitializedFieldError("sa".to_string()))?;
        let ct = self
            .ct
            .ok_or_else(|| DynHeightError::UninitializedFieldError("ct".to_string()))?;
        let p = self
            .p
            .ok_or_else(|| DynHeightError::UninitializedFieldError("p".to_string()))?;
        let p_ref = self
            .p_ref
            .ok_or_else(|| DynHeightError::UninitializedFieldError("p_ref".to_string()))?;
        let max_dp_i = self.max_dp_i.unwrap_or(DEFAULT_MAX_DP_I);
        Self::validate_lengths(sa, ct, p)?;
        Self::validate_pressure(p)?;
        Self::validate_p_ref(p, p_ref)?;
        Self::validate_max_dp_i(max_dp_i)?;

        let start = Instant::now();
        let p = p.to_vec();
        let sa = sa.to_vec();
        let ct = ct.to_vec();

        let direct_ref = if p[0] == 0.0 {
            p.iter().position(|&v| v == p_ref)
        } else {
            None
        };
        let max_dp = p.windows(2).map(|w| w[1] - w[0]).fold(0.0, f64::max);

        let dyn_height = match direct_ref {
            Some(i_ref) if max_dp <= max_dp_i => {
                debug!(
                    "integrating dynamic height directly on {} samples (max dp {})",
                    p.len(),
                    max_dp
                );
                DynamicHeight {
                    values: Self::integrate(&sa, &ct, &p, i_ref),
                    p_ref,
                    refined: false,
                }
            }
            _ => {
                let (p_i, original_idx, i_ref) = Self::build_grid(&p, p_ref, max_dp_i)?;
                debug!(
                    "integrating dynamic height on a refined grid of {} nodes ({} samples)",
                    p_i.len(),
                    p.len()
                );
                let sa_i = pchip_interp(&p, &sa, &p_i);
                let ct_i = pchip_interp(&p, &ct, &p_i);
                let fine = Self::integrate(
                    sa_i.as_slice().unwrap_or(&[]),
                    ct_i.as_slice().unwrap_or(&[]),
                    &p_i,
                    i_ref,
                );
                DynamicHeight {
                    values: original_idx.iter().map(|&i| fine[i]).collect(),
                    p_ref,
                    refined: true,
                }
            }
        };
        info!(
            "Dynamic height computed in {}",
            format_duration(start.elapsed())
        );
        Ok(dyn_height)
    }

    /// Trapezoidal integration of the specific volume anomaly, anchored to
    /// zero at `i_ref`.
    fn integrate(sa: &[f64], ct: &[f64], p: &[f64], i_ref: usize) -> Array1<f64> {
        let b: Vec<f64> = (0..p.len())
            .map(|i| specvol_anom(sa[i], ct[i], p[i]))
            .collect();
        let mut cumulative = Array1::<f64>::zeros(p.len());
        for i in 1..p.len() {
            let b_av = 0.5 * (b[i] + b[i - 1]);
            cumulative[i] = cumulative[i - 1] + b_av * (p[i] - p[i - 1]) * DB2PA;
        }
        let at_ref = cumulative[i_ref];
        cumulative.mapv(|c| at_ref - c)
    }

    /// Pressure grid with nodes at 0, at `p_ref` and at every sample, and no
    /// step larger than `max_dp_i`. Returns the grid, the grid index of each
    /// original sample and the grid index of `p_ref`.
    fn build_grid(
        p: &[f64],
        p_ref: f64,
        max_dp_i: f64,
    ) -> Result<(Vec<f64>, Vec<usize>, usize), DynHeightError> {
        let mut anchors: Vec<f64> = Vec::with_capacity(p.len() + 2);
        if p[0] > 0.0 {
            anchors.push(0.0);
        }
        anchors.extend_from_slice(p);
        if !anchors.contains(&p_ref) {
            let pos = anchors.partition_point(|&v| v < p_ref);
            anchors.insert(pos, p_ref);
        }

        let steps: Vec<f64> = anchors
            .windows(2)
            .map(|w| ((w[1] - w[0]) / max_dp_i).ceil().max(1.0))
            .collect();
        let num_nodes = steps.iter().sum::<f64>() + 1.0;
        if num_nodes > MAX_GRID_NODES as f64 {
            return Err(DynHeightError::GridTooLarge(
                num_nodes.min(usize::MAX as f64) as usize,
                MAX_GRID_NODES,
            ));
        }

        let mut grid = Vec::with_capacity(num_nodes as usize);
        grid.push(anchors[0]);
        for (w, &n) in anchors.windows(2).zip(steps.iter()) {
            let n = n as usize;
            let step = (w[1] - w[0]) / n as f64;
            for k in 1..n {
                grid.push(w[0] + k as f64 * step);
            }
            grid.push(w[1]);
        }

        let mut original_idx = Vec::with_capacity(p.len());
        let mut cursor = 0;
        for &value in p {
            while grid[cursor] != value {
                cursor += 1;
            }
            original_idx.push(cursor);
        }
        let i_ref = grid.iter().position(|&v| v == p_ref).unwrap_or(0);
        trace!("refined grid: {:?}", grid);
        Ok((grid, original_idx, i_ref))
    }

    fn validate_lengths(
        sa: &Array1<f64>,
        ct: &Array1<f64>,
        p: &Array1<f64>,
    ) -> Result<(), DynHeightError> {
        if sa.len() != ct.len() || sa.len() != p.len() {
            return Err(DynHeightError::LengthMismatch(sa.len(), ct.len(), p.len()));
        }
        if p.len() < 2 {
            return Err(DynHeightError::TooFewSamples(p.len()));
        }
        Ok(())
    }

    fn validate_pressure(p: &Array1<f64>) -> Result<(), DynHeightError> {
        if let Some((i, &v)) = p.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DynHeightError::NonFinitePressure(i, v));
        }
        if p[0] < 0.0 {
            return Err(DynHeightError::NegativePressure(p[0]));
        }
        for i in 1..p.len() {
            if p[i] == p[i - 1] {
                return Err(DynHeightError::DuplicatePressure(i, p[i]));
            }
            if !(p[i] > p[i - 1]) {
                return Err(DynHeightError::NonMonotonicPressure(i, p[i - 1], p[i]));
            }
        }
        let p_max = p[p.len() - 1];
        if p_max > MAX_SEA_PRESSURE {
            return Err(DynHeightError::PressureOutOfRange(p_max, MAX_SEA_PRESSURE));
        }
        Ok(())
    }

    fn validate_p_ref(p: &Array1<f64>, p_ref: f64) -> Result<(), DynHeightError> {
        let p_max = p[p.len() - 1];
        if !(0.0..=p_max).contains(&p_ref) {
            return Err(DynHeightError::ReferencePressureOutOfRange(p_ref, p_max));
        }
        Ok(())
    }

    fn validate_max_dp_i(max_dp_i: f64) -> Result<(), DynHeightError> {
        if !(max_dp_i > 0.0) {
            return Err(DynHeightError::InvalidMaxDp(max_dp_i));
        }
        Ok(())
    }

    pub fn sa(&mut self, sa: &'a Array1<f64>) -> &mut Self {
        self.sa = Some(sa);
        self
    }

    pub fn ct(&mut self, ct: &'a Array1<f64>) -> &mut Self {
        self.ct = Some(ct);
        self
    }

    pub fn p(&mut self, p: &'a Array1<f64>) -> &mut Self {
        self.p = Some(p);
        self
    }

    pub fn p_ref(&mut self, p_ref: f64) -> &mut Self {
        self.p_ref = Some(p_ref);
        self
    }

    pub fn max_dp_i(&mut self, max_dp_i: f64) -> &mut Self {
        self.max_dp_i = Some(max_dp_i);
        self
    }
}

/// Dynamic height anomaly (m²/s²) of each sample relative to `p_ref`.
pub fn geo_strf_dyn_height(
    sa: &Array1<f64>,
    ct: &Array1<f64>,
    p: &Array1<f64>,
    p_ref: f64,
) -> Result<Array1<f64>, DynHeightError> {
    let dyn_height = DynHeightBuilder::default()
        .sa(sa)
        .ct(ct)
        .p(p)
        .p_ref(p_ref)
        .build()?;
    Ok(dyn_height.into_values())
}

/// Depth (m, positive down) from sea pressure, with the standard-ocean
/// depth of [`oceanography::p2d`] corrected by the dynamic height anomaly
/// referenced to the surface.
pub fn depth_from_pressure(
    sa: &Array1<f64>,
    ct: &Array1<f64>,
    p: &Array1<f64>,
    lat: f64,
    max_dp_i: f64,
) -> Result<Array1<f64>, DynHeightError> {
    let dyn_height = DynHeightBuilder::default()
        .sa(sa)
        .ct(ct)
        .p(p)
        .p_ref(0.0)
        .max_dp_i(max_dp_i)
        .build()?;
    Ok(p.iter()
        .zip(dyn_height.values().iter())
        .map(|(&p, &dh)| oceanography::p2d(p, lat) - dh / oceanography::gravity(lat, p))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dyn_height::specvol::SSO;

    fn warm_cast(p: &[f64]) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
        let p = Array1::from(p.to_vec());
        let sa = p.mapv(|p| 35.0 + p * 1e-4);
        let ct = p.mapv(|p| 20.0 - p * 0.01);
        (sa, ct, p)
    }

    #[test]
    fn test_direct_integration_anchored_at_reference() {
        let (sa, ct, p) = warm_cast(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let dh = DynHeightBuilder::default()
            .sa(&sa)
            .ct(&ct)
            .p(&p)
            .p_ref(5.0)
            .build()
            .unwrap();
        assert!(!dh.refined());
        assert_eq!(dh.values()[5], 0.0);
        // warm water above the reference level stands higher
        assert!(dh.values()[0] > 0.0);
        for w in dh.values().as_slice().unwrap().windows(2) {
            assert!(w[0] > w[1]);
        }
    }

    #[test]
    fn test_refined_grid_matches_direct_integration() {
        crate::setup_pretty_env_logger_default();
        let fine: Vec<f64> = (0..=200).map(|i| i as f64 * 0.5).collect();
        let (sa, ct, p) = warm_cast(&fine);
        let direct = geo_strf_dyn_height(&sa, &ct, &p, 100.0).unwrap();

        let coarse_p: Vec<f64> = vec![5.0, 20.0, 45.0, 70.0, 100.0];
        let (sa_c, ct_c, p_c) = warm_cast(&coarse_p);
        let dh = DynHeightBuilder::default()
            .sa(&sa_c)
            .ct(&ct_c)
            .p(&p_c)
            .p_ref(100.0)
            .build()
            .unwrap();
        assert!(dh.refined());
        assert_eq!(dh.values().len(), 5);
        assert_eq!(dh.values()[4], 0.0);
        let direct_at_45 = direct[90];
        assert!((dh.values()[2] - direct_at_45).abs() < 0.01 * direct_at_45.abs());
    }

    #[test]
    fn test_reference_between_samples() {
        let (sa, ct, p) = warm_cast(&[0.0, 10.0, 20.0, 30.0]);
        let dh = geo_strf_dyn_height(&sa, &ct, &p, 15.0).unwrap();
        assert!(dh[1] > 0.0);
        assert!(dh[2] < 0.0);
    }

    #[test]
    fn test_standard_ocean_has_zero_dynamic_height() {
        let p = Array1::from(vec![0.0, 250.0, 500.0, 1000.0]);
        let sa = Array1::from_elem(4, SSO);
        let ct = Array1::zeros(4);
        let dh = geo_strf_dyn_height(&sa, &ct, &p, 1000.0).unwrap();
        assert!(dh.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_rejects_invalid_input() {
        let (sa, ct, p) = warm_cast(&[0.0, 10.0, 10.0]);
        assert_eq!(
            geo_strf_dyn_height(&sa, &ct, &p, 0.0),
            Err(DynHeightError::DuplicatePressure(2, 10.0))
        );
        let (sa, ct, p) = warm_cast(&[0.0, 10.0, 5.0]);
        assert_eq!(
            geo_strf_dyn_height(&sa, &ct, &p, 0.0),
            Err(DynHeightError::NonMonotonicPressure(2, 10.0, 5.0))
        );
        let (sa, ct, p) = warm_cast(&[0.0, 10.0]);
        assert_eq!(
            geo_strf_dyn_height(&sa, &ct, &p, 20.0),
            Err(DynHeightError::ReferencePressureOutOfRange(20.0, 10.0))
        );
        let (sa, ct, p) = warm_cast(&[3.0]);
        assert_eq!(
            geo_strf_dyn_height(&sa, &ct, &p, 0.0),
            Err(DynHeightError::TooFewSamples(1))
        );
        let (sa, ct, p) = warm_cast(&[-1.0, 3.0]);
        assert_eq!(
            geo_strf_dyn_height(&sa, &ct, &p, 0.0),
            Err(DynHeightError::NegativePressure(-1.0))
        );
        let short = Array1::from(vec![35.0]);
        let (_, ct, p) = warm_cast(&[0.0, 1.0]);
        assert_eq!(
            geo_strf_dyn_height(&short, &ct, &p, 0.0),
            Err(DynHeightError::LengthMismatch(1, 2, 2))
        );
    }

    #[test]
    fn test_rejects_non_finite_and_out_of_range_pressure() {
        let (sa, ct, _) = warm_cast(&[0.0, 10.0, 20.0]);
        let p = Array1::from(vec![0.0, 10.0, f64::INFINITY]);
        assert_eq!(
            geo_strf_dyn_height(&sa, &ct, &p, 0.0),
            Err(DynHeightError::NonFinitePressure(2, f64::INFINITY))
        );
        let p = Array1::from(vec![0.0, f64::NAN, 20.0]);
        assert!(matches!(
            geo_strf_dyn_height(&sa, &ct, &p, 0.0),
            Err(DynHeightError::NonFinitePressure(1, _))
        ));
        let p = Array1::from(vec![0.0, 10.0, 1e12]);
        assert_eq!(
            geo_strf_dyn_height(&sa, &ct, &p, 0.0),
            Err(DynHeightError::PressureOutOfRange(1e12, MAX_SEA_PRESSURE))
        );
        let (sa, ct, p) = warm_cast(&[0.0, 10.0, 20.0]);
        assert!(matches!(
            geo_strf_dyn_height(&sa, &ct, &p, f64::NAN),
            Err(DynHeightError::ReferencePressureOutOfRange(..))
        ));
    }

    #[test]
    fn test_refined_grid_size_is_capped() {
        let (sa, ct, p) = warm_cast(&[5.0, 6000.0, 11000.0]);
        let result = DynHeightBuilder::default()
            .sa(&sa)
            .ct(&ct)
            .p(&p)
            .p_ref(0.0)
            .max_dp_i(1e-3)
            .build();
        assert!(matches!(
            result,
            Err(DynHeightError::GridTooLarge(n, MAX_GRID_NODES)) if n > MAX_GRID_NODES
        ));
    }

    #[test]
    fn test_missing_builder_field() {
        let (sa, ct, _) = warm_cast(&[0.0, 1.0]);
        let result = DynHeightBuilder::default().sa(&sa).ct(&ct).p_ref(0.0).build();
        assert!(matches!(
            result,
            Err(DynHeightError::UninitializedFieldError(ref field)) if field == "p"
        ));
    }

    #[test]
    fn test_warm_water_is_deeper_than_standard_depth() {
        let (sa, ct, p) = warm_cast(&[0.0, 200.0, 500.0, 1000.0]);
        let depth = depth_from_pressure(&sa, &ct, &p, 45.0, DEFAULT_MAX_DP_I).unwrap();
        assert_eq!(depth[0], 0.0);
        for i in 1..4 {
            assert!(depth[i] > oceanography::p2d(p[i], 45.0));
        }
    }
}
