// ssprs-profile/src/oceanography/equations.rs

//! Empirical seawater equations.
//!
//! Every function here is permissive: inputs outside the published validity
//! range of an equation are evaluated anyway and NaN propagates silently.
//! Use [`super::DomainCheck`] when inputs must be validated first.
//!
//! Units: depth in m, pressure in dbar, temperature in °C, salinity in ppt,
//! latitude in decimal degrees.

use libm::sin;
use log::{trace, warn};
use ndarray::{Array1, ArrayBase, Data, Ix1, Zip};

/// Latitude used when a cast has no position.
pub const DEFAULT_LATITUDE: f64 = 30.0;

const SAL_SEARCH_MIN: f64 = 0.0;
const SAL_SEARCH_MAX: f64 = 50.0;
const SAL_SPEED_TOLERANCE: f64 = 0.0005;
const SAL_MAX_ITERATIONS: usize = 100;

const IN_SITU_STEP: f64 = 0.001;
const IN_SITU_MAX_STEPS: usize = 100_000;

fn sin2_lat(lat: f64) -> f64 {
    let x = sin(lat.to_radians());
    x * x
}

/// Gravity variation with latitude and pressure (Fofonoff & Millard, 1983).
pub fn gravity(lat: f64, p: f64) -> f64 {
    let x = sin2_lat(lat);
    9.780318 * (1.0 + (5.2788e-3 + 2.36e-5 * x) * x) + 1.092e-6 * p
}

/// Depth from pressure (Fofonoff & Millard, 1983).
pub fn p2d(p: f64, lat: f64) -> f64 {
    let numerator = (((-1.82e-15 * p + 2.279e-10) * p - 2.2512e-5) * p + 9.72659) * p;
    numerator / gravity(lat, p)
}

/// Pressure from depth (Leroy & Parthiot, 1998).
///
/// This is not the algebraic inverse of [`p2d`]: the two come from different
/// reference equations and only agree to within a fraction of a dbar.
pub fn d2p(d: f64, lat: f64) -> f64 {
    let g = 9.7803 * (1.0 + 5.3e-3 * sin2_lat(lat));
    let k = (g - 2.0e-5 * d) / (9.80612 - 2.0e-5 * d);
    let h45 = 1.00818e-2 * d + 2.465e-8 * d.powi(2) - 1.25e-13 * d.powi(3) + 2.8e-19 * d.powi(4);
    // MPa -> dbar
    100.0 * h45 * k
}

/// Sound speed in seawater.
///
/// Chen & Millero (1977) polynomial with the Wong & Zhu (1995) ITS-90
/// coefficients. Depth is converted to pressure with [`d2p`].
pub fn speed(d: f64, t: f64, s: f64, lat: f64) -> f64 {
    // bar
    let p = d2p(d, lat) / 10.0;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;
    let p2 = p * p;
    let p3 = p2 * p;

    let cw = (1402.388 + 5.03830 * t - 5.81090e-2 * t2 + 3.3432e-4 * t3 - 1.47797e-6 * t4
        + 3.1419e-9 * t5)
        + (0.153563 + 6.8999e-4 * t - 8.1829e-6 * t2 + 1.3632e-7 * t3 - 6.1260e-10 * t4) * p
        + (3.1260e-5 - 1.7111e-6 * t + 2.5986e-8 * t2 - 2.5353e-10 * t3 + 1.0415e-12 * t4) * p2
        + (-9.7729e-9 + 3.8513e-10 * t - 2.3654e-12 * t2) * p3;

    let a = (1.389 - 1.262e-2 * t + 7.166e-5 * t2 + 2.008e-6 * t3 - 3.21e-8 * t4)
        + (9.4742e-5 - 1.2583e-5 * t - 6.4928e-8 * t2 + 1.0515e-8 * t3 - 2.0142e-10 * t4) * p
        + (-3.9064e-7 + 9.1061e-9 * t - 1.6009e-10 * t2 + 7.994e-12 * t3) * p2
        + (1.100e-10 + 6.651e-12 * t - 3.391e-13 * t2) * p3;

    let b = -1.922e-2 - 4.42e-5 * t + (7.3637e-5 + 1.7950e-7 * t) * p;

    let dd = 1.727e-3 - 7.9836e-6 * p;

    cw + a * s + b * s.powf(1.5) + dd * s * s
}

/// Salinity from sound speed, by bisection of [`speed`] over [0, 50] ppt.
///
/// Returns the best estimate found. A warning is logged when the iteration
/// cap is reached or the bracket collapses before the residual drops below
/// 0.0005 m/s.
pub fn sal(d: f64, speed_target: f64, t: f64, lat: f64) -> f64 {
    if !(d.is_finite() && speed_target.is_finite() && t.is_finite() && lat.is_finite()) {
        return f64::NAN;
    }
    let mut lower = SAL_SEARCH_MIN;
    let mut upper = SAL_SEARCH_MAX;
    let mut s = 0.5 * (lower + upper);
    for iteration in 0..SAL_MAX_ITERATIONS {
        let residual = speed(d, t, s, lat) - speed_target;
        if residual.abs() < SAL_SPEED_TOLERANCE {
            trace!("sal converged to {} after {} iterations", s, iteration + 1);
            return s;
        }
        if residual > 0.0 {
            upper = s;
        } else {
            lower = s;
        }
        if upper - lower < 1e-12 {
            warn!(
                "salinity bracket collapsed at {} (depth {}, speed {}, temp {})",
                s, d, speed_target, t
            );
            return s;
        }
        s = 0.5 * (lower + upper);
    }
    warn!(
        "salinity search hit {} iterations without converging (depth {}, speed {}, temp {})",
        SAL_MAX_ITERATIONS, d, speed_target, t
    );
    s
}

/// Adiabatic temperature gradient in °C/dbar (Fofonoff & Millard, 1983).
pub fn atg(s: f64, t: f64, p: f64) -> f64 {
    let ds = s - 35.0;
    (((-2.1687e-16 * t + 1.8676e-14) * t - 4.6206e-13) * p
        + ((2.7759e-12 * t - 1.1351e-10) * ds
            + ((-5.4481e-14 * t + 8.733e-12) * t - 6.7795e-10) * t
            + 1.8741e-8))
        * p
        + (-4.2393e-8 * t + 1.8932e-6) * ds
        + ((6.6228e-10 * t - 6.836e-8) * t + 8.5258e-6) * t
        + 3.5803e-5
}

/// Potential temperature at reference pressure `pr`, by a single
/// fourth-order Runge-Kutta step of [`atg`] from `p` to `pr`.
pub fn pot_temp(s: f64, t: f64, p: f64, pr: f64) -> f64 {
    let h = pr - p;
    let mut p = p;

    let mut xk = h * atg(s, t, p);
    let mut t = t + 0.5 * xk;
    let mut q = xk;

    p += 0.5 * h;
    xk = h * atg(s, t, p);
    t += 0.29289322 * (xk - q);
    q = 0.58578644 * xk + 0.121320344 * q;

    xk = h * atg(s, t, p);
    t += 1.707106781 * (xk - q);
    q = 3.414213562 * xk - 4.121320344 * q;

    p += 0.5 * h;
    xk = h * atg(s, t, p);
    t + (xk - 2.0 * q) / 6.0
}

/// In-situ temperature at pressure `p` for potential temperature `theta`
/// referenced to `pr`.
///
/// Walks the estimate in 0.001 °C steps towards the target until its
/// potential temperature is within 0.001 °C of `theta`.
pub fn in_situ_temp(s: f64, theta: f64, p: f64, pr: f64) -> f64 {
    if !(s.is_finite() && theta.is_finite() && p.is_finite() && pr.is_finite()) {
        return f64::NAN;
    }
    let mut estimate = theta;
    for _ in 0..IN_SITU_MAX_STEPS {
        let delta = theta - pot_temp(s, estimate, p, pr);
        if delta.abs() < IN_SITU_STEP {
            return estimate;
        }
        estimate += IN_SITU_STEP.copysign(delta);
    }
    warn!(
        "in-situ temperature search stopped after {} steps (theta {}, p {}, pr {})",
        IN_SITU_MAX_STEPS, theta, p, pr
    );
    estimate
}

pub fn p2d_array<S: Data<Elem = f64>>(p: &ArrayBase<S, Ix1>, lat: f64) -> Array1<f64> {
    p.mapv(|p| p2d(p, lat))
}

pub fn d2p_array<S: Data<Elem = f64>>(d: &ArrayBase<S, Ix1>, lat: f64) -> Array1<f64> {
    d.mapv(|d| d2p(d, lat))
}

pub fn speed_array<S: Data<Elem = f64>>(
    d: &ArrayBase<S, Ix1>,
    t: &ArrayBase<S, Ix1>,
    s: &ArrayBase<S, Ix1>,
    lat: f64,
) -> Array1<f64> {
    Zip::from(d)
        .and(t)
        .and(s)
        .map_collect(|&d, &t, &s| speed(d, t, s, lat))
}

pub fn sal_array<S: Data<Elem = f64>>(
    d: &ArrayBase<S, Ix1>,
    c: &ArrayBase<S, Ix1>,
    t: &ArrayBase<S, Ix1>,
    lat: f64,
) -> Array1<f64> {
    Zip::from(d)
        .and(c)
        .and(t)
        .map_collect(|&d, &c, &t| sal(d, c, t, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p2d_check_value() {
        let depth = p2d(10000.0, 30.0);
        assert!((depth - 9712.653).abs() < 0.001, "got {}", depth);
    }

    #[test]
    fn test_d2p_check_value() {
        let pressure = d2p(9712.653, 30.0);
        assert!((pressure - 10000.0).abs() < 1.0, "got {}", pressure);
    }

    #[test]
    fn test_surface_is_zero() {
        assert_eq!(p2d(0.0, 45.0), 0.0);
        assert_eq!(d2p(0.0, 45.0), 0.0);
    }

    #[test]
    fn test_speed_fresh_water_at_surface() {
        assert!((speed(0.0, 0.0, 0.0, 30.0) - 1402.388).abs() < 1e-9);
    }

    #[test]
    fn test_speed_surface_seawater() {
        let c = speed(0.0, 10.0, 35.0, 30.0);
        assert!((c - 1489.83).abs() < 0.01, "got {}", c);
    }

    #[test]
    fn test_speed_increases_with_depth() {
        let shallow = speed(10.0, 4.0, 35.0, 30.0);
        let deep = speed(2000.0, 4.0, 35.0, 30.0);
        assert!(deep > shallow + 30.0);
    }

    #[test]
    fn test_sal_inverts_speed() {
        for &d in &[0.0, 150.0, 1200.0, 4000.0] {
            for &t in &[0.0, 4.5, 18.0, 29.0, 40.0] {
                for &s in &[0.0, 12.0, 34.7, 40.0] {
                    let c = speed(d, t, s, 45.0);
                    let inverted = sal(d, c, t, 45.0);
                    assert!(
                        (inverted - s).abs() < 0.01,
                        "d={} t={} s={} -> {}",
                        d,
                        t,
                        s,
                        inverted
                    );
                }
            }
        }
    }

    #[test]
    fn test_sal_propagates_nan() {
        assert!(sal(10.0, f64::NAN, 10.0, 30.0).is_nan());
        assert!(sal(10.0, 1490.0, f64::NAN, 30.0).is_nan());
        assert!(sal(f64::NAN, 1490.0, 10.0, 30.0).is_nan());
        assert!(sal(10.0, f64::INFINITY, 10.0, 30.0).is_nan());
        assert!(in_situ_temp(35.0, f64::NAN, 1000.0, 0.0).is_nan());
    }

    #[test]
    fn test_atg_check_value() {
        let gradient = atg(40.0, 40.0, 10000.0);
        assert!((gradient - 3.255976e-4).abs() < 1e-9, "got {}", gradient);
    }

    #[test]
    fn test_pot_temp_check_value() {
        let theta = pot_temp(40.0, 40.0, 10000.0, 0.0);
        assert!((theta - 36.89073).abs() < 1e-5, "got {}", theta);
    }

    #[test]
    fn test_in_situ_temp_round_trip() {
        let theta = pot_temp(40.0, 40.0, 10000.0, 0.0);
        let t = in_situ_temp(40.0, theta, 10000.0, 0.0);
        assert!((t - 40.0).abs() < 0.001, "got {}", t);
    }

    #[test]
    fn test_array_helpers_match_scalars() {
        let d = Array1::from(vec![0.0, 100.0, 500.0]);
        let t = Array1::from(vec![20.0, 12.0, 6.0]);
        let s = Array1::from(vec![35.0, 35.1, 34.8]);
        let c = speed_array(&d, &t, &s, 10.0);
        for i in 0..3 {
            assert_eq!(c[i], speed(d[i], t[i], s[i], 10.0));
        }
        let back = sal_array(&d, &c, &t, 10.0);
        for i in 0..3 {
            assert!((back[i] - s[i]).abs() < 0.01);
        }
        let p = d2p_array(&d, 10.0);
        assert_eq!(p2d_array(&p, 10.0).len(), 3);
    }
}
