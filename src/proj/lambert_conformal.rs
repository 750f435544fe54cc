//! Lambert Conformal Conic projection: 1SP and 2SP variants.
//!
//! Uses `tsfn`, `msfn`, `phi_from_ts` from common.rs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::proj::common::{msfn, phi_from_ts, tsfn};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

/// Lambert Conformal Conic with one standard parallel (the origin latitude).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambertConformalConic1SpParams {
    pub lon0: f64,
    pub lat0: f64,
    pub scale: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// Lambert Conformal Conic with two standard parallels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambertConformalConic2SpParams {
    pub lon0: f64,
    pub lat0: f64,
    pub lat1: f64,
    pub lat2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

#[derive(Debug)]
pub struct LambertConformalConic {
    ellipsoid: Ellipsoid,
    lon0: f64,
    n: f64,     // cone constant
    f_val: f64, // F = m₁/(n·t₁ⁿ), scaled by k₀ for 1SP
    rho0: f64,  // ρ₀ = a·F·t₀ⁿ
    false_easting: f64,
    false_northing: f64,
}

impl LambertConformalConic {
    pub fn new_2sp(ellipsoid: Ellipsoid, params: &LambertConformalConic2SpParams) -> Self {
        let e = ellipsoid.e;
        let e2 = ellipsoid.e2;
        let lat0 = params.lat0.to_radians();
        let lat1 = params.lat1.to_radians();
        let lat2 = params.lat2.to_radians();

        let m1 = msfn(lat1, e2);
        let m2 = msfn(lat2, e2);
        let t0 = tsfn(lat0, e);
        let t1 = tsfn(lat1, e);
        let t2 = tsfn(lat2, e);

        // Coinciding parallels: limiting form, avoids 0/0
        let n = if (lat1 - lat2).abs() > 1e-10 {
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        } else {
            lat1.sin()
        };

        let f_val = m1 / (n * t1.powf(n));
        let rho0 = ellipsoid.a * f_val * t0.powf(n);

        Self {
            ellipsoid,
            lon0: params.lon0.to_radians(),
            n,
            f_val,
            rho0,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }

    pub fn new_1sp(ellipsoid: Ellipsoid, params: &LambertConformalConic1SpParams) -> Self {
        let lat0 = params.lat0.to_radians();

        let n = lat0.sin();
        let m0 = msfn(lat0, ellipsoid.e2);
        let t0 = tsfn(lat0, ellipsoid.e);

        let f_val = m0 / (n * t0.powf(n)) * params.scale;
        let rho0 = ellipsoid.a * f_val * t0.powf(n);

        Self {
            ellipsoid,
            lon0: params.lon0.to_radians(),
            n,
            f_val,
            rho0,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

impl Projection for LambertConformalConic {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let t = tsfn(lat, self.ellipsoid.e);
        let rho = self.ellipsoid.a * self.f_val * t.powf(self.n);
        let theta = self.n * (lon - self.lon0);

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x_ = x - self.false_easting;
        let y_ = self.rho0 - (y - self.false_northing);

        // For n < 0, flip signs before computing angle and radius
        let (xn, yn) = if self.n < 0.0 { (-x_, -y_) } else { (x_, y_) };

        let rho = (xn * xn + yn * yn).sqrt();
        let theta = xn.atan2(yn); // atan2(x', y'), not atan2(y', x')

        let ts = (rho / (self.ellipsoid.a * self.f_val)).powf(1.0 / self.n);
        let lat = phi_from_ts(ts, self.ellipsoid.e);
        let lon = self.lon0 + theta / self.n;
        (lon, lat)
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
