//! Coordinate reference systems: an ellipsoid, a coordinate kind, an optional
//! datum transformation to the WGS84 hub and an optional area of use.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::datum::DatumTransform;
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::{Projection, ProjectionParams};

/// Geographic bounding box in degrees.
///
/// `west > east` describes a box crossing the antimeridian.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Area {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Area {
    pub const WORLD: Area = Area {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// False for anything outside ±180° / ±90°, whatever the box says.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if !(lon.abs() <= 180.0 && lat.abs() <= 90.0) {
            return false;
        }
        let in_lon = if self.west <= self.east {
            lon >= self.west && lon <= self.east
        } else {
            lon >= self.west || lon <= self.east
        };
        in_lon && lat >= self.south && lat <= self.north
    }
}

/// What the three coordinate components mean.
#[derive(Clone, Debug)]
pub enum CrsKind {
    /// Earth-centred X, Y, Z in metres.
    Geocentric,
    /// Longitude, latitude in degrees and ellipsoidal height in metres.
    Geographic,
    /// Easting, northing in metres and ellipsoidal height in metres.
    Projected {
        params: ProjectionParams,
        projection: Arc<dyn Projection>,
    },
}

#[derive(Clone, Debug)]
pub struct Crs {
    ellipsoid: Ellipsoid,
    datum: Option<DatumTransform>,
    kind: CrsKind,
    area: Option<Area>,
}

impl Crs {
    pub fn geocentric(ellipsoid: Ellipsoid) -> Self {
        Self::with_kind(ellipsoid, CrsKind::Geocentric)
    }

    pub fn geographic(ellipsoid: Ellipsoid) -> Self {
        Self::with_kind(ellipsoid, CrsKind::Geographic)
    }

    pub fn projected(ellipsoid: Ellipsoid, params: ProjectionParams) -> Self {
        let projection = params.build(ellipsoid);
        Self::with_kind(ellipsoid, CrsKind::Projected { params, projection })
    }

    /// A CRS that maps every input to NaN, standing in for one that could not
    /// be resolved.
    pub fn invalid() -> Self {
        Self::geographic(Ellipsoid::wgs84()).with_datum(DatumTransform::Invalid)
    }

    fn with_kind(ellipsoid: Ellipsoid, kind: CrsKind) -> Self {
        Self {
            ellipsoid,
            datum: None,
            kind,
            area: None,
        }
    }

    pub fn with_datum(mut self, datum: impl Into<DatumTransform>) -> Self {
        self.datum = Some(datum.into());
        self
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = Some(area);
        self
    }

    /// Same datum and area, different coordinate kind.
    pub fn to_projected(&self, params: ProjectionParams) -> Self {
        Self {
            kind: CrsKind::Projected {
                params,
                projection: params.build(self.ellipsoid),
            },
            ..self.clone()
        }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn datum(&self) -> Option<&DatumTransform> {
        self.datum.as_ref()
    }

    pub fn kind(&self) -> &CrsKind {
        &self.kind
    }

    pub fn area(&self) -> Option<&Area> {
        self.area.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.datum.as_ref().map_or(true, DatumTransform::is_valid)
    }

    /// Whether a hub longitude/latitude lies in this CRS's area of use.
    /// A CRS without an area accepts every valid coordinate.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.area.unwrap_or(Area::WORLD).contains(lon, lat)
    }

    /// CRS coordinates to geocentric on this CRS's own ellipsoid.
    pub fn to_geocentric(&self, a: f64, b: f64, c: f64) -> (f64, f64, f64) {
        match &self.kind {
            CrsKind::Geocentric => (a, b, c),
            CrsKind::Geographic => self.ellipsoid.to_geocentric(a, b, c),
            CrsKind::Projected { projection, .. } => {
                let (lon, lat) = projection.inverse(a, b);
                self.ellipsoid
                    .to_geocentric(lon.to_degrees(), lat.to_degrees(), c)
            }
        }
    }

    /// Geocentric on this CRS's own ellipsoid to CRS coordinates.
    pub fn from_geocentric(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        match &self.kind {
            CrsKind::Geocentric => (x, y, z),
            CrsKind::Geographic => self.ellipsoid.from_geocentric(x, y, z),
            CrsKind::Projected { projection, .. } => {
                let (lon, lat, h) = self.ellipsoid.from_geocentric(x, y, z);
                let (e, n) = projection.forward(lon.to_radians(), lat.to_radians());
                (e, n, h)
            }
        }
    }

    /// CRS coordinates to hub geocentric.
    pub fn to_hub(&self, a: f64, b: f64, c: f64) -> (f64, f64, f64) {
        let (x, y, z) = self.to_geocentric(a, b, c);
        match &self.datum {
            Some(datum) => datum.to_hub(x, y, z),
            None => (x, y, z),
        }
    }

    /// Hub geocentric to CRS coordinates.
    pub fn from_hub(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let (x, y, z) = match &self.datum {
            Some(datum) => datum.from_hub(x, y, z),
            None => (x, y, z),
        };
        self.from_geocentric(x, y, z)
    }
}
