//! Reference ellipsoid and the geographic ↔ geocentric conversions on it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ProjError;

/// Reference ellipsoid parameters.
///
/// Defined by the semi-major axis and the inverse flattening; every other term
/// is derived once at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "EllipsoidDef", into = "EllipsoidDef")
)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Inverse flattening
    pub fi: f64,
    /// Flattening: 1 / fi
    pub f: f64,
    /// Semi-minor axis: a * (1 - f)
    pub b: f64,
    /// First eccentricity squared: 2/fi - f^2
    pub e2: f64,
    /// First eccentricity
    pub e: f64,
    pub e4: f64,
    pub e6: f64,
    /// Third flattening: (1 - sqrt(1 - e^2)) / (1 + sqrt(1 - e^2))
    pub ei: f64,
    pub ei2: f64,
    pub ei3: f64,
    pub ei4: f64,
}

impl Ellipsoid {
    /// Create an ellipsoid, rejecting non-positive axis or inverse flattening.
    pub fn try_new(a: f64, fi: f64) -> Result<Self, ProjError> {
        if !(a > 0.0 && a.is_finite()) {
            return Err(ProjError::InvalidParameter(format!(
                "semi-major axis must be positive, got {a}"
            )));
        }
        if !(fi > 0.0 && fi.is_finite()) {
            return Err(ProjError::InvalidParameter(format!(
                "inverse flattening must be positive, got {fi}"
            )));
        }
        Ok(Self::from_parts(a, fi))
    }

    pub(crate) fn from_parts(a: f64, fi: f64) -> Self {
        let f = 1.0 / fi;
        let b = a * (1.0 - f);
        let e2 = 2.0 / fi - f * f;
        let e = e2.sqrt();
        let root = (1.0 - e2).sqrt();
        let ei = (1.0 - root) / (1.0 + root);
        Self {
            a,
            fi,
            f,
            b,
            e2,
            e,
            e4: e2 * e2,
            e6: e2 * e2 * e2,
            ei,
            ei2: ei * ei,
            ei3: ei * ei * ei,
            ei4: ei * ei * ei * ei,
        }
    }

    pub fn wgs84() -> Self {
        Self::from_parts(6_378_137.0, 298.257_223_563)
    }

    pub fn grs80() -> Self {
        Self::from_parts(6_378_137.0, 298.257_222_101)
    }

    pub fn airy() -> Self {
        Self::from_parts(6_377_563.396, 299.324_964_6)
    }

    pub fn bessel() -> Self {
        Self::from_parts(6_377_397.155, 299.152_812_8)
    }

    pub fn clarke1866() -> Self {
        Self::from_parts(6_378_206.4, 294.978_698_213_900_6)
    }

    /// International 1924 (Hayford).
    pub fn international() -> Self {
        Self::from_parts(6_378_388.0, 297.0)
    }

    /// Prime-vertical radius of curvature N(φ).
    pub fn prime_vertical_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        self.a / (1.0 - self.e2 * s * s).sqrt()
    }

    /// Geographic (degrees, metres) to geocentric X, Y, Z (metres).
    pub fn to_geocentric(&self, lon: f64, lat: f64, h: f64) -> (f64, f64, f64) {
        let lam = lon.to_radians();
        let phi = lat.to_radians();
        let n = self.prime_vertical_radius(phi);
        let x = (n + h) * phi.cos() * lam.cos();
        let y = (n + h) * phi.cos() * lam.sin();
        let z = (n * (self.b * self.b) / (self.a * self.a) + h) * phi.sin();
        (x, y, z)
    }

    /// Geocentric X, Y, Z (metres) to geographic (degrees, metres).
    ///
    /// Closed-form Bowring back-substitution through the reduced latitude,
    /// no iteration.
    pub fn from_geocentric(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let p = (x * x + y * y).sqrt();
        let t = (z * self.a / (p * self.b)).atan();
        let (sin_t, cos_t) = t.sin_cos();
        let phi = ((z + self.e2 * self.a * self.a / self.b * sin_t.powi(3))
            / (p - self.e2 * self.a * cos_t.powi(3)))
        .atan();
        let h = p / phi.cos() - self.prime_vertical_radius(phi);
        (y.atan2(x).to_degrees(), phi.to_degrees(), h)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Serialized form of an [`Ellipsoid`]: only the two defining parameters.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct EllipsoidDef {
    a: f64,
    inverse_flattening: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<EllipsoidDef> for Ellipsoid {
    type Error = ProjError;

    fn try_from(def: EllipsoidDef) -> Result<Self, Self::Error> {
        Ellipsoid::try_new(def.a, def.inverse_flattening)
    }
}

#[cfg(feature = "serde")]
impl From<Ellipsoid> for EllipsoidDef {
    fn from(e: Ellipsoid) -> Self {
        EllipsoidDef {
            a: e.a,
            inverse_flattening: e.fi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_constants() {
        let wgs84 = Ellipsoid::wgs84();
        assert_relative_eq!(wgs84.a, 6_378_137.0);
        assert_relative_eq!(wgs84.b, 6_356_752.314_245_179, epsilon = 0.001);
        assert_relative_eq!(wgs84.e, 0.081_819_190_842_622, epsilon = 1e-12);
        assert_relative_eq!(wgs84.ei, 0.001_679_220_386_383_705, epsilon = 1e-12);
    }

    #[test]
    fn test_third_flattening_matches_axes() {
        let airy = Ellipsoid::airy();
        assert_relative_eq!(airy.ei, (airy.a - airy.b) / (airy.a + airy.b), epsilon = 1e-15);
        assert_relative_eq!(airy.ei4, airy.ei2 * airy.ei2, epsilon = 1e-20);
    }

    #[test]
    fn test_grs80_close_to_wgs84() {
        let (wgs84, grs80) = (Ellipsoid::wgs84(), Ellipsoid::grs80());
        assert_relative_eq!(wgs84.a, grs80.a);
        assert!((wgs84.f - grs80.f).abs() < 1e-8);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Ellipsoid::try_new(0.0, 298.0).is_err());
        assert!(Ellipsoid::try_new(6_378_137.0, -1.0).is_err());
        assert!(Ellipsoid::try_new(f64::NAN, 298.0).is_err());
        assert!(Ellipsoid::try_new(6_378_137.0, 298.257_223_563).is_ok());
    }

    #[test]
    fn test_geocentric_equator() {
        let wgs84 = Ellipsoid::wgs84();
        let (x, y, z) = wgs84.to_geocentric(0.0, 0.0, 0.0);
        assert_relative_eq!(x, 6_378_137.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(z, 0.0, epsilon = 1e-6);

        let (_, _, z) = wgs84.to_geocentric(0.0, 90.0, 0.0);
        assert_relative_eq!(z, wgs84.b, epsilon = 1e-6);
    }

    #[test]
    fn test_geocentric_roundtrip() {
        let bessel = Ellipsoid::bessel();
        let cases: &[(f64, f64, f64)] = &[
            (9.0, 52.0, 0.0),
            (-73.9857, 40.7484, 120.0),
            (139.6917, -35.6895, 3000.0),
            (179.5, 0.5, -50.0),
        ];
        for &(lon, lat, h) in cases {
            let (x, y, z) = bessel.to_geocentric(lon, lat, h);
            let (lon2, lat2, h2) = bessel.from_geocentric(x, y, z);
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-8);
            assert_relative_eq!(h2, h, epsilon = 1e-2);
        }
    }
}
