//! Albers Equal Area Conic projection.
//!
//! Area-preserving conic using `qsfn` from common.rs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::proj::common::{msfn, qsfn, CONFORMAL_STEPS};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlbersEqualAreaParams {
    pub lon0: f64,
    pub lat0: f64,
    pub lat1: f64,
    pub lat2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

#[derive(Debug)]
pub struct AlbersEqualArea {
    ellipsoid: Ellipsoid,
    lon0: f64,
    n: f64,
    c: f64,
    rho0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl AlbersEqualArea {
    pub fn new(ellipsoid: Ellipsoid, params: &AlbersEqualAreaParams) -> Self {
        let e = ellipsoid.e;
        let e2 = ellipsoid.e2;
        let lat0 = params.lat0.to_radians();
        let lat1 = params.lat1.to_radians();
        let lat2 = params.lat2.to_radians();

        let m1 = msfn(lat1, e2);
        let m2 = msfn(lat2, e2);
        let q0 = qsfn(lat0, e);
        let q1 = qsfn(lat1, e);
        let q2 = qsfn(lat2, e);

        let n = if (lat1 - lat2).abs() > 1e-10 {
            (m1 * m1 - m2 * m2) / (q2 - q1)
        } else {
            lat1.sin()
        };

        let c = m1 * m1 + n * q1;
        let rho0 = ellipsoid.a * (c - n * q0).abs().sqrt() / n;

        Self {
            ellipsoid,
            lon0: params.lon0.to_radians(),
            n,
            c,
            rho0,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }

    fn rho(&self, lat: f64) -> f64 {
        let q = qsfn(lat, self.ellipsoid.e);
        self.ellipsoid.a * (self.c - self.n * q).abs().sqrt() / self.n
    }
}

impl Projection for AlbersEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let theta = self.n * (lon - self.lon0);
        let rho = self.rho(lat);

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x_ = x - self.false_easting;
        let y_ = self.rho0 - (y - self.false_northing);

        let (xn, yn) = if self.n < 0.0 { (-x_, -y_) } else { (x_, y_) };

        let rho = (xn * xn + yn * yn).sqrt();
        let theta = xn.atan2(yn);

        let q = (self.c - (rho * self.n / self.ellipsoid.a).powi(2)) / self.n;

        // Authalic to geodetic: Snyder 3-16, fixed step count
        let e = self.ellipsoid.e;
        let e2 = self.ellipsoid.e2;
        let mut lat = (q / 2.0).clamp(-1.0, 1.0).asin();
        for _ in 0..CONFORMAL_STEPS {
            let sin_lat = lat.sin();
            let one_minus = 1.0 - e2 * sin_lat * sin_lat;
            lat += one_minus * one_minus / (2.0 * lat.cos())
                * (q / (1.0 - e2) - sin_lat / one_minus
                    + 1.0 / (2.0 * e) * ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).ln());
        }

        let lon = self.lon0 + theta / self.n;
        (lon, lat)
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
