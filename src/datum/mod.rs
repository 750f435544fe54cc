//! Datum transformations between a CRS's own geocentric frame and the WGS84 hub.

pub mod gridshift;
pub mod helmert;

use log::warn;

pub use gridshift::GridShift;
pub use helmert::Helmert;

use crate::error::ProjError;
use crate::grid::{GridCache, GridSource};
use crate::proj::ellipsoid::Ellipsoid;

/// How a datum's geocentric coordinates relate to the hub frame.
///
/// A CRS without a transformation is already on the hub.
#[derive(Clone, Debug)]
pub enum DatumTransform {
    Helmert(Helmert),
    GridShift(GridShift),
    /// Placeholder for a transformation that could not be built; yields NaN.
    Invalid,
}

impl DatumTransform {
    /// Grid-shift transformation for a datum on `ellipsoid`, loaded through
    /// `cache`. A grid that cannot be read or parsed gives [`DatumTransform::Invalid`].
    pub fn grid_shift(ellipsoid: Ellipsoid, cache: &GridCache, source: &GridSource) -> Self {
        Self::try_grid_shift(ellipsoid, cache, source).unwrap_or_else(|err| {
            warn!("grid {} unavailable, datum is invalid: {err}", source.key());
            DatumTransform::Invalid
        })
    }

    pub fn try_grid_shift(
        ellipsoid: Ellipsoid,
        cache: &GridCache,
        source: &GridSource,
    ) -> Result<Self, ProjError> {
        let grid = cache.get(source)?;
        Ok(DatumTransform::GridShift(GridShift::new(ellipsoid, grid)))
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, DatumTransform::Invalid)
    }

    /// Native geocentric to hub geocentric.
    pub fn to_hub(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        match self {
            DatumTransform::Helmert(h) => h.forward(x, y, z),
            DatumTransform::GridShift(g) => g.to_hub(x, y, z),
            DatumTransform::Invalid => (f64::NAN, f64::NAN, f64::NAN),
        }
    }

    /// Hub geocentric to native geocentric.
    pub fn from_hub(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        match self {
            DatumTransform::Helmert(h) => h.inverse(x, y, z),
            DatumTransform::GridShift(g) => g.from_hub(x, y, z),
            DatumTransform::Invalid => (f64::NAN, f64::NAN, f64::NAN),
        }
    }
}

impl From<Helmert> for DatumTransform {
    fn from(h: Helmert) -> Self {
        DatumTransform::Helmert(h)
    }
}

impl From<GridShift> for DatumTransform {
    fn from(g: GridShift) -> Self {
        DatumTransform::GridShift(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use std::path::PathBuf;

    #[test]
    fn test_invalid_yields_nan() {
        let (x, y, z) = DatumTransform::Invalid.to_hub(1.0, 2.0, 3.0);
        assert!(x.is_nan() && y.is_nan() && z.is_nan());
        let (x, y, z) = DatumTransform::Invalid.from_hub(1.0, 2.0, 3.0);
        assert!(x.is_nan() && y.is_nan() && z.is_nan());
    }

    #[test]
    fn test_missing_grid_becomes_invalid() {
        let cache = GridCache::new();
        let source = GridSource::Path(PathBuf::from("/nonexistent/datumkit/missing.gsb"));
        let datum = DatumTransform::grid_shift(Ellipsoid::bessel(), &cache, &source);
        assert!(!datum.is_valid());
        assert!(matches!(
            DatumTransform::try_grid_shift(Ellipsoid::bessel(), &cache, &source),
            Err(ProjError::Grid(GridError::Io(_)))
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_helmert_dispatch() {
        let datum: DatumTransform = Helmert::translation(10.0, 20.0, 30.0).into();
        assert!(datum.is_valid());
        assert_eq!(datum.to_hub(0.0, 0.0, 0.0), (10.0, 20.0, 30.0));
        assert_eq!(datum.from_hub(10.0, 20.0, 30.0), (0.0, 0.0, 0.0));
    }
}
