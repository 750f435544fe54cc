//! Seven-parameter Helmert similarity transform between geocentric frames.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arc-seconds to radians: π / 648 000.
const ARC_SECOND: f64 = std::f64::consts::PI / 648_000.0;

/// Position-vector Helmert parameters, source frame to the WGS84 hub.
///
/// Translations in metres, rotations in arc-seconds, scale in ppm.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Helmert {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub ds: f64,
}

impl Helmert {
    pub fn new(tx: f64, ty: f64, tz: f64, rx: f64, ry: f64, rz: f64, ds: f64) -> Self {
        Self {
            tx,
            ty,
            tz,
            rx,
            ry,
            rz,
            ds,
        }
    }

    /// Geocentric translation only (three-parameter datum shift).
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            tx,
            ty,
            tz,
            ..Self::default()
        }
    }

    /// Parameters with every sign flipped.
    ///
    /// Only an approximation of the true inverse; the error grows with the
    /// rotation and scale magnitudes.
    pub fn negated(&self) -> Self {
        Self::new(-self.tx, -self.ty, -self.tz, -self.rx, -self.ry, -self.rz, -self.ds)
    }

    pub fn forward(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let s = 1.0 + self.ds * 1e-6;
        let (rx, ry, rz) = (self.rx * ARC_SECOND, self.ry * ARC_SECOND, self.rz * ARC_SECOND);
        (
            s * (x + z * ry - y * rz) + self.tx,
            s * (y + x * rz - z * rx) + self.ty,
            s * (z + y * rx - x * ry) + self.tz,
        )
    }

    pub fn inverse(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        self.negated().forward(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translation_only() {
        let h = Helmert::translation(589.0, 76.0, 480.0);
        let (x, y, z) = h.forward(1.0, 2.0, 3.0);
        assert_relative_eq!(x, 590.0);
        assert_relative_eq!(y, 78.0);
        assert_relative_eq!(z, 483.0);
        let (x, y, z) = h.inverse(x, y, z);
        assert_relative_eq!(x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(z, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_identity() {
        let (x, y, z) = Helmert::default().forward(3_900_000.0, 900_000.0, 5_000_000.0);
        assert_eq!((x, y, z), (3_900_000.0, 900_000.0, 5_000_000.0));
    }

    #[test]
    fn test_rotation_direction() {
        // Position-vector convention: +rz turns the x axis towards y
        let h = Helmert::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let (x, y, _) = h.forward(6_378_137.0, 0.0, 0.0);
        assert_relative_eq!(x, 6_378_137.0, epsilon = 1e-3);
        assert_relative_eq!(y, 6_378_137.0 * ARC_SECOND, epsilon = 1e-6);
    }

    #[test]
    fn test_scale() {
        let h = Helmert::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0);
        let (x, _, _) = h.forward(1_000_000.0, 0.0, 0.0);
        assert_relative_eq!(x, 1_000_010.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negated_inverse_roundtrip() {
        // Small rotations and scale: second-order terms stay well below 1 µm
        let h = Helmert::new(1.0, -2.0, 0.5, 0.001, -0.002, 0.0015, 0.05);
        let p = (4_027_894.0, 307_045.0, 4_919_474.0);
        let q = h.forward(p.0, p.1, p.2);
        let r = h.inverse(q.0, q.1, q.2);
        assert_relative_eq!(r.0, p.0, epsilon = 1e-6);
        assert_relative_eq!(r.1, p.1, epsilon = 1e-6);
        assert_relative_eq!(r.2, p.2, epsilon = 1e-6);
    }

    #[test]
    fn test_negated_inverse_is_approximate() {
        // OSGB36 parameters: the sign-flip inverse misses by about a centimetre
        let h = Helmert::new(446.448, -125.157, 542.06, 0.15, 0.247, 0.842, -20.489);
        let p = (3_874_938.0, -116_218.0, 5_047_168.0);
        let q = h.forward(p.0, p.1, p.2);
        let r = h.inverse(q.0, q.1, q.2);
        let err = ((r.0 - p.0).powi(2) + (r.1 - p.1).powi(2) + (r.2 - p.2).powi(2)).sqrt();
        assert!(err < 0.1, "error {err}");
    }
}
