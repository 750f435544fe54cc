//! Equidistant Conic projection.
//!
//! Same cone layout as the Lambert conic, but radii are measured along the
//! meridian arc so distances along meridians are true.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::proj::common::{footpoint_latitude, meridional_arc, msfn};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EquidistantConicParams {
    pub lon0: f64,
    pub lat0: f64,
    pub lat1: f64,
    pub lat2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

#[derive(Debug)]
pub struct EquidistantConic {
    ellipsoid: Ellipsoid,
    lon0: f64,
    n: f64,
    g: f64,
    rho0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl EquidistantConic {
    pub fn new(ellipsoid: Ellipsoid, params: &EquidistantConicParams) -> Self {
        let a = ellipsoid.a;
        let lat0 = params.lat0.to_radians();
        let lat1 = params.lat1.to_radians();
        let lat2 = params.lat2.to_radians();

        let m1 = msfn(lat1, ellipsoid.e2);
        let m2 = msfn(lat2, ellipsoid.e2);
        let arc1 = meridional_arc(&ellipsoid, lat1);
        let arc2 = meridional_arc(&ellipsoid, lat2);

        let n = if (lat1 - lat2).abs() > 1e-10 {
            a * (m1 - m2) / (arc2 - arc1)
        } else {
            lat1.sin()
        };

        let g = m1 / n + arc1 / a;
        let rho0 = a * g - meridional_arc(&ellipsoid, lat0);

        Self {
            ellipsoid,
            lon0: params.lon0.to_radians(),
            n,
            g,
            rho0,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }
}

impl Projection for EquidistantConic {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let rho = self.ellipsoid.a * self.g - meridional_arc(&self.ellipsoid, lat);
        let theta = self.n * (lon - self.lon0);

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x_ = x - self.false_easting;
        let y_ = self.rho0 - (y - self.false_northing);

        let (xn, yn) = if self.n < 0.0 { (-x_, -y_) } else { (x_, y_) };

        let mut rho = (xn * xn + yn * yn).sqrt();
        if self.n < 0.0 {
            rho = -rho;
        }
        let theta = xn.atan2(yn);

        let arc = self.ellipsoid.a * self.g - rho;
        let lat = footpoint_latitude(&self.ellipsoid, arc);
        let lon = self.lon0 + theta / self.n;
        (lon, lat)
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
