use std::sync::Arc;

use crate::grid::Grid;
use crate::proj::ellipsoid::Ellipsoid;

/// Grid-based datum shift.
///
/// The grid is applied to geographic coordinates on the datum's own
/// ellipsoid; the shifted point is placed on the WGS84 hub ellipsoid.
#[derive(Clone, Debug)]
pub struct GridShift {
    ellipsoid: Ellipsoid,
    hub: Ellipsoid,
    grid: Arc<Grid>,
}

impl GridShift {
    pub fn new(ellipsoid: Ellipsoid, grid: Arc<Grid>) -> Self {
        Self {
            ellipsoid,
            hub: Ellipsoid::wgs84(),
            grid,
        }
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn to_hub(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let (lon, lat, h) = self.ellipsoid.from_geocentric(x, y, z);
        let (lon, lat) = self.grid.apply(lon, lat);
        self.hub.to_geocentric(lon, lat, h)
    }

    pub fn from_hub(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let (lon, lat, h) = self.hub.from_geocentric(x, y, z);
        let (lon, lat) = self.grid.apply_inverse(lon, lat);
        self.ellipsoid.to_geocentric(lon, lat, h)
    }
}
