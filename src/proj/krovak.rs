//! Krovak oblique conformal conic projection (EPSG method 9819).
//!
//! The ellipsoid is mapped conformally onto a Gaussian sphere, rotated to an
//! oblique pole, then projected onto a cone tangent along the pseudo standard
//! parallel. Output keeps the historical south/west orientation: the first
//! coordinate is the westing, the second the southing, both positive over the
//! Czech and Slovak territory.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::FRAC_PI_4;

use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

/// Fixed number of latitude refinement steps in the inverse.
const LATITUDE_STEPS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KrovakParams {
    /// Longitude of origin (degrees east of Greenwich)
    pub lon0: f64,
    /// Latitude of the projection centre (degrees)
    pub lat_c: f64,
    /// Co-latitude of the cone axis, i.e. azimuth of the initial line (degrees)
    pub azimuth: f64,
    /// Latitude of the pseudo standard parallel (degrees)
    pub pseudo_standard_parallel: f64,
    /// Scale factor on the pseudo standard parallel
    pub scale: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

#[derive(Debug)]
pub struct Krovak {
    ellipsoid: Ellipsoid,
    lon0: f64,
    sin_alpha: f64,
    cos_alpha: f64,
    b: f64,
    t0: f64,
    n: f64,
    r0: f64,
    // tan(π/4 + φP/2)
    tan_p: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Krovak {
    pub fn new(ellipsoid: Ellipsoid, params: &KrovakParams) -> Self {
        let (e, e2) = (ellipsoid.e, ellipsoid.e2);
        let lat_c = params.lat_c.to_radians();
        let alpha = params.azimuth.to_radians();
        let lat_p = params.pseudo_standard_parallel.to_radians();
        let sin_c = lat_c.sin();

        let a = ellipsoid.a * (1.0 - e2).sqrt() / (1.0 - e2 * sin_c * sin_c);
        let b = (1.0 + e2 * lat_c.cos().powi(4) / (1.0 - e2)).sqrt();
        let gamma0 = (sin_c / b).asin();
        let t0 = (FRAC_PI_4 + gamma0 / 2.0).tan()
            * ((1.0 + e * sin_c) / (1.0 - e * sin_c)).powf(e * b / 2.0)
            / (FRAC_PI_4 + lat_c / 2.0).tan().powf(b);
        let n = lat_p.sin();
        let r0 = params.scale * a / lat_p.tan();

        Self {
            ellipsoid,
            lon0: params.lon0.to_radians(),
            sin_alpha: alpha.sin(),
            cos_alpha: alpha.cos(),
            b,
            t0,
            n,
            r0,
            tan_p: (FRAC_PI_4 + lat_p / 2.0).tan(),
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }

    /// Ratio ((1 + e sin φ) / (1 - e sin φ)).
    fn esin_ratio(&self, lat: f64) -> f64 {
        let es = self.ellipsoid.e * lat.sin();
        (1.0 + es) / (1.0 - es)
    }
}

impl Projection for Krovak {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let e = self.ellipsoid.e;
        let u = 2.0
            * ((self.t0 * (lat / 2.0 + FRAC_PI_4).tan().powf(self.b)
                / self.esin_ratio(lat).powf(e * self.b / 2.0))
            .atan()
                - FRAC_PI_4);
        let v = self.b * (self.lon0 - lon);

        let t = (self.cos_alpha * u.sin() + self.sin_alpha * u.cos() * v.cos()).asin();
        let d = (u.cos() * v.sin() / t.cos()).asin();
        let theta = self.n * d;
        let r = self.r0 * self.tan_p.powf(self.n) / (t / 2.0 + FRAC_PI_4).tan().powf(self.n);

        let southing = r * theta.cos();
        let westing = r * theta.sin();
        (westing + self.false_easting, southing + self.false_northing)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let e = self.ellipsoid.e;
        let westing = x - self.false_easting;
        let southing = y - self.false_northing;

        let r = westing.hypot(southing);
        let theta = westing.atan2(southing);
        let d = theta / self.n;
        let t = 2.0 * (((self.r0 / r).powf(1.0 / self.n) * self.tan_p).atan() - FRAC_PI_4);
        let u = (self.cos_alpha * t.sin() - self.sin_alpha * t.cos() * d.cos()).asin();
        let v = (t.cos() * d.sin() / u.cos()).asin();
        let lon = self.lon0 - v / self.b;

        let base = self.t0.powf(-1.0 / self.b) * (u / 2.0 + FRAC_PI_4).tan().powf(1.0 / self.b);
        let mut lat = u;
        for _ in 0..LATITUDE_STEPS {
            lat = 2.0 * ((base * self.esin_ratio(lat).powf(e / 2.0)).atan() - FRAC_PI_4);
        }
        (lon, lat)
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
