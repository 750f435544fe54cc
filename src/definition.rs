//! Declarative CRS definitions, deserializable from JSON, TOML and the like.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::datum::{DatumTransform, Helmert};
use crate::grid::{GridCache, GridSource};
use crate::proj::crs::{Area, Crs};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::ProjectionParams;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrsDefinition {
    pub ellipsoid: Ellipsoid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<DatumDefinition>,
    pub kind: KindDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatumDefinition {
    Helmert(Helmert),
    GridShift { source: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindDefinition {
    Geocentric,
    Geographic,
    Projected(ProjectionParams),
}

impl CrsDefinition {
    /// Build the CRS, loading any grid through `cache`. A grid that cannot be
    /// loaded leaves the CRS invalid rather than failing.
    pub fn build(&self, cache: &GridCache) -> Crs {
        let mut crs = match self.kind {
            KindDefinition::Geocentric => Crs::geocentric(self.ellipsoid),
            KindDefinition::Geographic => Crs::geographic(self.ellipsoid),
            KindDefinition::Projected(params) => Crs::projected(self.ellipsoid, params),
        };
        if let Some(datum) = &self.datum {
            crs = crs.with_datum(match datum {
                DatumDefinition::Helmert(h) => DatumTransform::Helmert(*h),
                DatumDefinition::GridShift { source } => DatumTransform::grid_shift(
                    self.ellipsoid,
                    cache,
                    &GridSource::Path(source.clone()),
                ),
            });
        }
        if let Some(area) = self.area {
            crs = crs.with_area(area);
        }
        crs
    }
}
