//! Common helpers for projection math (meridional arc, latitude conversions, etc.).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::ellipsoid::Ellipsoid;

/// Fixed number of refinement steps used by the conformal-latitude inverses.
pub const CONFORMAL_STEPS: usize = 5;

/// Meridional arc length M(φ) from the equator, series in e² (Snyder 3-21).
pub fn meridional_arc(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    let (e2, e4, e6) = (ellipsoid.e2, ellipsoid.e4, ellipsoid.e6);
    ellipsoid.a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Footpoint latitude from a meridional arc length (inverse of [`meridional_arc`]).
///
/// Goes through the rectifying latitude μ and the series in the third flattening.
pub fn footpoint_latitude(ellipsoid: &Ellipsoid, m: f64) -> f64 {
    let (e2, e4, e6) = (ellipsoid.e2, ellipsoid.e4, ellipsoid.e6);
    let (ei, ei2, ei3, ei4) = (ellipsoid.ei, ellipsoid.ei2, ellipsoid.ei3, ellipsoid.ei4);
    let mu = m / (ellipsoid.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    mu + (3.0 * ei / 2.0 - 27.0 * ei3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * ei2 / 16.0 - 55.0 * ei4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * ei3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * ei4 / 512.0) * (8.0 * mu).sin()
}

/// m(φ) = cos φ / sqrt(1 - e² sin² φ)
pub fn msfn(phi: f64, e2: f64) -> f64 {
    let s = phi.sin();
    phi.cos() / (1.0 - e2 * s * s).sqrt()
}

/// t(φ) = tan(π/4 - φ/2) / ((1 - e sin φ) / (1 + e sin φ))^(e/2)
pub fn tsfn(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

/// Recover φ from t by fixed-point refinement of the conformal relation.
pub fn phi_from_ts(ts: f64, e: f64) -> f64 {
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..CONFORMAL_STEPS {
        let es = e * phi.sin();
        phi = FRAC_PI_2 - 2.0 * (ts * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).atan();
    }
    phi
}

/// Authalic q(φ) function.
pub fn qsfn(phi: f64, e: f64) -> f64 {
    let s = phi.sin();
    let es = e * s;
    (1.0 - e * e) * (s / (1.0 - es * es) - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
}
