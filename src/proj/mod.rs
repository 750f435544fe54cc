pub mod albers_equal_area;
pub mod common;
pub mod crs;
pub mod ellipsoid;
pub mod equidistant_conic;
pub mod krovak;
pub mod lambert_azimuthal;
pub mod lambert_conformal;
pub mod mercator;
pub mod pipeline;
pub mod transverse_mercator;

use std::fmt::Debug;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use self::albers_equal_area::{AlbersEqualArea, AlbersEqualAreaParams};
use self::ellipsoid::Ellipsoid;
use self::equidistant_conic::{EquidistantConic, EquidistantConicParams};
use self::krovak::{Krovak, KrovakParams};
use self::lambert_azimuthal::{LambertAzimuthalEqualArea, LambertAzimuthalEqualAreaParams};
use self::lambert_conformal::{
    LambertConformalConic, LambertConformalConic1SpParams, LambertConformalConic2SpParams,
};
use self::mercator::{Mercator, MercatorParams, WebMercator};
use self::transverse_mercator::{TransverseMercator, TransverseMercatorParams};

/// Trait for map projections supporting forward and inverse transforms.
///
/// Angles are radians on both sides; projected coordinates are metres.
pub trait Projection: Send + Sync + Debug {
    /// Forward: (lon_rad, lat_rad) -> (easting, northing)
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Inverse: (easting, northing) -> (lon_rad, lat_rad)
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);

    /// Batch forward transform (default: loop).
    fn forward_batch(&self, coords: &mut [(f64, f64)]) {
        for c in coords.iter_mut() {
            *c = self.forward(c.0, c.1);
        }
    }

    /// Batch inverse transform.
    fn inverse_batch(&self, coords: &mut [(f64, f64)]) {
        for c in coords.iter_mut() {
            *c = self.inverse(c.0, c.1);
        }
    }

    fn ellipsoid(&self) -> &Ellipsoid;
}

/// Parameters of every supported projection method.
///
/// Angles are degrees, offsets metres. [`ProjectionParams::build`] binds the
/// parameters to an ellipsoid and precomputes the method's constants.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "method", rename_all = "snake_case")
)]
pub enum ProjectionParams {
    WebMercator,
    Mercator(MercatorParams),
    TransverseMercator(TransverseMercatorParams),
    LambertConformalConic1Sp(LambertConformalConic1SpParams),
    LambertConformalConic2Sp(LambertConformalConic2SpParams),
    AlbersEqualArea(AlbersEqualAreaParams),
    LambertAzimuthalEqualArea(LambertAzimuthalEqualAreaParams),
    EquidistantConic(EquidistantConicParams),
    Krovak(KrovakParams),
}

impl ProjectionParams {
    pub fn build(&self, ellipsoid: Ellipsoid) -> Arc<dyn Projection> {
        match self {
            ProjectionParams::WebMercator => Arc::new(WebMercator::new(ellipsoid)),
            ProjectionParams::Mercator(p) => Arc::new(Mercator::new(ellipsoid, p)),
            ProjectionParams::TransverseMercator(p) => {
                Arc::new(TransverseMercator::new(ellipsoid, p))
            }
            ProjectionParams::LambertConformalConic1Sp(p) => {
                Arc::new(LambertConformalConic::new_1sp(ellipsoid, p))
            }
            ProjectionParams::LambertConformalConic2Sp(p) => {
                Arc::new(LambertConformalConic::new_2sp(ellipsoid, p))
            }
            ProjectionParams::AlbersEqualArea(p) => Arc::new(AlbersEqualArea::new(ellipsoid, p)),
            ProjectionParams::LambertAzimuthalEqualArea(p) => {
                Arc::new(LambertAzimuthalEqualArea::new(ellipsoid, p))
            }
            ProjectionParams::EquidistantConic(p) => {
                Arc::new(EquidistantConic::new(ellipsoid, p))
            }
            ProjectionParams::Krovak(p) => Arc::new(Krovak::new(ellipsoid, p)),
        }
    }
}
