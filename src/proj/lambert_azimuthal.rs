//! Lambert Azimuthal Equal Area projection, oblique ellipsoidal form.
//!
//! Works on the authalic sphere of radius `Rq`; `D` rescales the axes so the
//! projection is true to scale along the centre's parallel. The inverse goes
//! back from authalic to geodetic latitude with the closed e² series, no
//! iteration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::FRAC_PI_2;

use crate::proj::common::{msfn, qsfn};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambertAzimuthalEqualAreaParams {
    /// Longitude of the projection centre (degrees)
    pub lon0: f64,
    /// Latitude of the projection centre (degrees)
    pub lat0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

#[derive(Debug)]
pub struct LambertAzimuthalEqualArea {
    ellipsoid: Ellipsoid,
    lon0: f64,
    qp: f64,
    rq: f64,
    d: f64,
    sin_beta0: f64,
    cos_beta0: f64,
    // Authalic → geodetic series coefficients
    apa: [f64; 3],
    false_easting: f64,
    false_northing: f64,
}

impl LambertAzimuthalEqualArea {
    pub fn new(ellipsoid: Ellipsoid, params: &LambertAzimuthalEqualAreaParams) -> Self {
        let e = ellipsoid.e;
        let lat0 = params.lat0.to_radians();

        let qp = qsfn(FRAC_PI_2, e);
        let beta0 = (qsfn(lat0, e) / qp).clamp(-1.0, 1.0).asin();
        let rq = ellipsoid.a * (qp / 2.0).sqrt();
        let d = ellipsoid.a * msfn(lat0, ellipsoid.e2) / (rq * beta0.cos());

        let (e2, e4, e6) = (ellipsoid.e2, ellipsoid.e4, ellipsoid.e6);
        let apa = [
            e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0,
            23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0,
            761.0 * e6 / 45360.0,
        ];

        Self {
            ellipsoid,
            lon0: params.lon0.to_radians(),
            qp,
            rq,
            d,
            sin_beta0: beta0.sin(),
            cos_beta0: beta0.cos(),
            apa,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

impl Projection for LambertAzimuthalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let beta = (qsfn(lat, self.ellipsoid.e) / self.qp).clamp(-1.0, 1.0).asin();
        let (sin_beta, cos_beta) = beta.sin_cos();
        let dlon = lon - self.lon0;
        let (sin_dlon, cos_dlon) = dlon.sin_cos();

        let b = self.rq
            * (2.0 / (1.0 + self.sin_beta0 * sin_beta + self.cos_beta0 * cos_beta * cos_dlon))
                .sqrt();

        let x = self.false_easting + b * self.d * cos_beta * sin_dlon;
        let y = self.false_northing
            + b / self.d * (self.cos_beta0 * sin_beta - self.sin_beta0 * cos_beta * cos_dlon);
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x_ = x - self.false_easting;
        let y_ = y - self.false_northing;

        let rho = ((x_ / self.d).powi(2) + (self.d * y_).powi(2)).sqrt();
        if rho == 0.0 {
            let lat0 = (self.sin_beta0).asin();
            return (self.lon0, self.authalic_to_geodetic(lat0));
        }

        let c = 2.0 * (rho / (2.0 * self.rq)).clamp(-1.0, 1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();

        let beta = (cos_c * self.sin_beta0 + self.d * y_ * sin_c * self.cos_beta0 / rho)
            .clamp(-1.0, 1.0)
            .asin();

        let lon = self.lon0
            + (x_ * sin_c).atan2(
                self.d * rho * self.cos_beta0 * cos_c
                    - self.d * self.d * y_ * self.sin_beta0 * sin_c,
            );
        (lon, self.authalic_to_geodetic(beta))
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}

impl LambertAzimuthalEqualArea {
    fn authalic_to_geodetic(&self, beta: f64) -> f64 {
        beta + self.apa[0] * (2.0 * beta).sin()
            + self.apa[1] * (4.0 * beta).sin()
            + self.apa[2] * (6.0 * beta).sin()
    }
}
