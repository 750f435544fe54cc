//! Coordinate conversion between geocentric, geographic and projected CRSs
//! across geodetic datums, chained through a geocentric WGS84 hub.

pub mod datum;
#[cfg(feature = "serde")]
pub mod definition;
pub mod error;
pub mod func;
pub mod grid;
pub mod proj;
pub mod registry;

pub use datum::{DatumTransform, GridShift, Helmert};
pub use error::{GridError, ProjError};
pub use func::{Func, SafeFunc};
pub use grid::{Grid, GridCache, GridSource};
pub use proj::crs::{Area, Crs, CrsKind};
pub use proj::ellipsoid::Ellipsoid;
pub use proj::pipeline::{safe_transform, transform, Pipeline};
pub use proj::{Projection, ProjectionParams};
pub use registry::Registry;
