// ssprs-profile/src/interp.rs

//! One-dimensional interpolation over strictly increasing abscissae.
//!
//! Targets outside `[x[0], x[n-1]]` take the nearest end value.

use ndarray::Array1;

fn endpoint_slope(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);
    if d.signum() != delta0.signum() {
        0.0
    } else if delta0.signum() != delta1.signum() && d.abs() > 3.0 * delta0.abs() {
        3.0 * delta0
    } else {
        d
    }
}

fn slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();
    if n == 2 {
        return vec![delta[0], delta[0]];
    }
    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        if delta[k - 1] * delta[k] > 0.0 {
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
        }
    }
    d[0] = endpoint_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = endpoint_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

/// Piecewise linear interpolation.
pub fn linear_interp(x: &[f64], y: &[f64], xi: &[f64]) -> Array1<f64> {
    let n = x.len();
    if n == 0 {
        return Array1::from_elem(xi.len(), f64::NAN);
    }
    xi.iter()
        .map(|&target| {
            if target <= x[0] {
                return y[0];
            }
            if target >= x[n - 1] {
                return y[n - 1];
            }
            let k = x.partition_point(|&v| v <= target) - 1;
            y[k] + (y[k + 1] - y[k]) * (target - x[k]) / (x[k + 1] - x[k])
        })
        .collect()
}

/// Monotone piecewise cubic Hermite interpolation (Fritsch & Carlson, 1980).
pub fn pchip_interp(x: &[f64], y: &[f64], xi: &[f64]) -> Array1<f64> {
    let n = x.len();
    if n == 0 {
        return Array1::from_elem(xi.len(), f64::NAN);
    }
    if n == 1 {
        return Array1::from_elem(xi.len(), y[0]);
    }
    let d = slopes(x, y);
    xi.iter()
        .map(|&target| {
            if target <= x[0] {
                return y[0];
            }
            if target >= x[n - 1] {
                return y[n - 1];
            }
            // first node strictly greater than target, minus one
            let k = x.partition_point(|&v| v <= target) - 1;
            let h = x[k + 1] - x[k];
            let s = (target - x[k]) / h;
            let h00 = (1.0 + 2.0 * s) * (1.0 - s) * (1.0 - s);
            let h10 = s * (1.0 - s) * (1.0 - s);
            let h01 = s * s * (3.0 - 2.0 * s);
            let h11 = s * s * (s - 1.0);
            h00 * y[k] + h10 * h * d[k] + h01 * y[k + 1] + h11 * h * d[k + 1]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproduces_nodes() {
        let x = [0.0, 10.0, 25.0, 50.0];
        let y = [20.0, 18.0, 12.0, 8.0];
        let yi = pchip_interp(&x, &y, &x);
        for (a, b) in yi.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_data_stays_linear() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let yi = pchip_interp(&x, &y, &[0.5, 1.25, 2.9]);
        assert!((yi[0] - 2.0).abs() < 1e-12);
        assert!((yi[1] - 3.5).abs() < 1e-12);
        assert!((yi[2] - 6.8).abs() < 1e-12);
    }

    #[test]
    fn test_monotone_without_overshoot() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 0.0, 1.0, 1.0, 1.0];
        let xi: Vec<f64> = (0..=40).map(|i| i as f64 * 0.1).collect();
        let yi = pchip_interp(&x, &y, &xi);
        for w in yi.as_slice().unwrap().windows(2) {
            assert!(w[1] >= w[0] - 1e-12);
        }
        assert!(yi.iter().all(|&v| (-1e-12..=1.0 + 1e-12).contains(&v)));
    }

    #[test]
    fn test_linear_interp() {
        let x = [0.0, 10.0, 30.0];
        let y = [35.0, 34.0, 36.0];
        let yi = linear_interp(&x, &y, &[-5.0, 5.0, 20.0, 30.0, 50.0]);
        assert_eq!(yi.to_vec(), vec![35.0, 34.5, 35.0, 36.0, 36.0]);
    }

    #[test]
    fn test_clamps_outside_range() {
        let yi = pchip_interp(&[1.0, 2.0], &[5.0, 6.0], &[0.0, 3.0]);
        assert_eq!(yi.to_vec(), vec![5.0, 6.0]);
    }
}
