//! Mercator projection: Normal (ellipsoidal, 1SP) and Web Mercator (EPSG:3857).
//!
//! Normal Mercator (ellipsoidal with scale factor at the equator):
//!   forward: x = a·k₀·(λ - λ₀), y = -a·k₀·ln(tsfn(φ, e))
//!   inverse: λ = λ₀ + x/(a·k₀), φ = phi_from_ts(exp(-y/(a·k₀)), e)
//!
//! Web Mercator (EPSG:3857, spherical):
//!   forward: x = a·λ, y = a·ln(tan(π/4 + φ/2))
//!   inverse: λ = x/a, φ = 2·atan(exp(y/a)) - π/2

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::proj::common::{phi_from_ts, tsfn};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

/// Parameters of the ellipsoidal Mercator (variant A, scale at the equator).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MercatorParams {
    /// Central meridian (degrees)
    pub lon0: f64,
    /// Scale factor on the equator
    pub scale: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// Ellipsoidal Mercator projection.
#[derive(Debug)]
pub struct Mercator {
    ellipsoid: Ellipsoid,
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Mercator {
    pub fn new(ellipsoid: Ellipsoid, params: &MercatorParams) -> Self {
        Self {
            ellipsoid,
            lon0: params.lon0.to_radians(),
            k0: params.scale,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

impl Projection for Mercator {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let ak0 = self.ellipsoid.a * self.k0;
        let x = ak0 * (lon - self.lon0) + self.false_easting;
        // tsfn < 1 for positive latitudes, so -ln(tsfn) > 0 → y > 0
        let y = ak0 * (-tsfn(lat, self.ellipsoid.e).ln()) + self.false_northing;
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let ak0 = self.ellipsoid.a * self.k0;
        let lon = self.lon0 + (x - self.false_easting) / ak0;
        let ts = (-(y - self.false_northing) / ak0).exp();
        (lon, phi_from_ts(ts, self.ellipsoid.e))
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}

/// Web Mercator projection (EPSG:3857) with spherical formulas on the ellipsoid's
/// semi-major axis.
#[derive(Debug)]
pub struct WebMercator {
    ellipsoid: Ellipsoid,
}

/// Maximum latitude for Web Mercator (≈85.0511°), where the projection
/// is bounded to a square.
const MAX_LAT_3857: f64 = 1.4844222297453324; // atan(sinh(π)) in radians

impl WebMercator {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(Ellipsoid::wgs84())
    }
}

impl Projection for WebMercator {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.clamp(-MAX_LAT_3857, MAX_LAT_3857);
        let x = self.ellipsoid.a * lon;
        let y = self.ellipsoid.a * (FRAC_PI_4 + lat / 2.0).tan().ln();
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = x / self.ellipsoid.a;
        let lat = 2.0 * (y / self.ellipsoid.a).exp().atan() - FRAC_PI_2;
        (lon, lat)
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn world_mercator() -> Mercator {
        Mercator::new(
            Ellipsoid::wgs84(),
            &MercatorParams {
                lon0: 0.0,
                scale: 1.0,
                false_easting: 0.0,
                false_northing: 0.0,
            },
        )
    }

    #[test]
    fn test_web_mercator_origin() {
        let proj = WebMercator::default();
        let (x, y) = proj.forward(0.0, 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_web_mercator_roundtrip() {
        let proj = WebMercator::default();
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (10.0, 45.0),
            (-73.9857, 40.7484), // NYC
            (139.6917, 35.6895), // Tokyo
            (-180.0, 0.0),
            (180.0, 0.0),
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y);
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_web_mercator_epsg3857_reference() {
        // (180°, 0°) → (20037508.34, 0)
        let proj = WebMercator::default();
        let (x, _) = proj.forward(PI, 0.0);
        assert_relative_eq!(x, 20_037_508.342_789_244, epsilon = 0.01);
    }

    #[test]
    fn test_web_mercator_polar_clamp() {
        let proj = WebMercator::default();
        let (_, y) = proj.forward(0.0, FRAC_PI_2);
        assert!(y.is_finite(), "y should be finite at pole, got {y}");
    }

    #[test]
    fn test_ellipsoidal_mercator_roundtrip() {
        let proj = world_mercator();
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (10.0, 45.0),
            (-73.9857, 40.7484),
            (139.6917, -35.6895),
            (25.0, 75.0),
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y);
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_ellipsoidal_mercator_known_point() {
        // EPSG guidance note 7-2 example: Makassar / NEIEZ on Bessel 1841,
        // 120°E, 3°S → E = 5009726.58, N = 569150.82
        let proj = Mercator::new(
            Ellipsoid::bessel(),
            &MercatorParams {
                lon0: 110.0,
                scale: 0.997,
                false_easting: 3_900_000.0,
                false_northing: 900_000.0,
            },
        );
        let (x, y) = proj.forward(120.0_f64.to_radians(), (-3.0_f64).to_radians());
        assert_relative_eq!(x, 5_009_726.58, epsilon = 0.01);
        assert_relative_eq!(y, 569_150.82, epsilon = 0.01);
    }

    #[test]
    fn test_ellipsoidal_northing_below_spherical() {
        let ell = world_mercator();
        let web = WebMercator::default();
        let lat = 60.0_f64.to_radians();
        let (_, y_ell) = ell.forward(0.0, lat);
        let (_, y_web) = web.forward(0.0, lat);
        assert!(y_ell < y_web);
    }
}
