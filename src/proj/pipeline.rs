//! Pipeline: CRS-to-CRS conversion chained through the geocentric WGS84 hub.
//!
//! Every conversion runs the same six legs:
//!
//! 1. source projection inverse (skipped unless projected)
//! 2. geographic to geocentric on the source ellipsoid (skipped for geocentric)
//! 3. source datum to hub
//! 4. hub to target datum
//! 5. geocentric to geographic on the target ellipsoid (skipped for geocentric)
//! 6. target projection forward (skipped unless projected)

use crate::error::ProjError;
use crate::func::{Func, SafeFunc};
use crate::proj::crs::Crs;
use crate::proj::ellipsoid::Ellipsoid;

/// A bound source/target pair.
#[derive(Clone, Debug)]
pub struct Pipeline {
    src: Crs,
    dst: Crs,
    hub: Ellipsoid,
}

impl Pipeline {
    pub fn new(src: &Crs, dst: &Crs) -> Self {
        Self {
            src: src.clone(),
            dst: dst.clone(),
            hub: Ellipsoid::wgs84(),
        }
    }

    pub fn src(&self) -> &Crs {
        &self.src
    }

    pub fn dst(&self) -> &Crs {
        &self.dst
    }

    /// The same pipeline in the opposite direction.
    pub fn inverse(&self) -> Self {
        Self::new(&self.dst, &self.src)
    }

    /// Convert one coordinate. Never fails; unresolvable input gives NaN.
    pub fn transform(&self, a: f64, b: f64, c: f64) -> (f64, f64, f64) {
        let (x, y, z) = self.src.to_hub(a, b, c);
        self.dst.from_hub(x, y, z)
    }

    /// Convert one coordinate, refusing it unless its hub longitude/latitude
    /// lies in both areas of use.
    pub fn transform_checked(&self, a: f64, b: f64, c: f64) -> Result<(f64, f64, f64), ProjError> {
        let (x, y, z) = self.src.to_hub(a, b, c);
        let (lon, lat, _) = self.hub.from_geocentric(x, y, z);
        if !self.src.contains(lon, lat) || !self.dst.contains(lon, lat) {
            return Err(ProjError::OutOfBounds { lon, lat });
        }
        Ok(self.dst.from_hub(x, y, z))
    }

    /// Convert coordinates in place.
    pub fn transform_batch(&self, coords: &mut [(f64, f64, f64)]) {
        for c in coords.iter_mut() {
            *c = self.transform(c.0, c.1, c.2);
        }
    }

    pub fn into_func(self) -> Func {
        Func::new(move |a, b, c| self.transform(a, b, c))
    }

    pub fn into_safe_func(self) -> SafeFunc {
        SafeFunc::new(move |a, b, c| self.transform_checked(a, b, c))
    }
}

/// Conversion from `src` to `dst` as a composable function.
pub fn transform(src: &Crs, dst: &Crs) -> Func {
    Pipeline::new(src, dst).into_func()
}

/// Like [`transform`], returning [`ProjError::OutOfBounds`] for coordinates
/// outside either CRS's area of use.
pub fn safe_transform(src: &Crs, dst: &Crs) -> SafeFunc {
    Pipeline::new(src, dst).into_safe_func()
}
