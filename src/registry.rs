//! Registry of CRSs keyed by EPSG code.
//!
//! There is no process-wide registry: callers build one, usually with
//! [`Registry::with_epsg_defaults`], and pass it where lookups happen.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};

use crate::datum::Helmert;
use crate::error::ProjError;
use crate::func::Func;
use crate::proj::albers_equal_area::AlbersEqualAreaParams;
use crate::proj::crs::{Area, Crs};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::krovak::KrovakParams;
use crate::proj::lambert_azimuthal::LambertAzimuthalEqualAreaParams;
use crate::proj::lambert_conformal::LambertConformalConic2SpParams;
use crate::proj::pipeline;
use crate::proj::transverse_mercator::TransverseMercatorParams;
use crate::proj::ProjectionParams;

#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<u32, Crs>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `crs` under `code`, replacing any previous entry.
    pub fn add(&self, code: u32, crs: Crs) {
        self.lock().insert(code, crs);
    }

    pub fn get(&self, code: u32) -> Option<Crs> {
        self.lock().get(&code).cloned()
    }

    pub fn try_code(&self, code: u32) -> Result<Crs, ProjError> {
        self.get(code)
            .ok_or_else(|| ProjError::UnknownCrs(format!("EPSG:{code}")))
    }

    /// The CRS registered under `code`, or [`Crs::invalid`] when there is none.
    pub fn code(&self, code: u32) -> Crs {
        self.try_code(code).unwrap_or_else(|err| {
            warn!("{err}, using invalid CRS");
            Crs::invalid()
        })
    }

    /// Codes whose area of use contains the given WGS84 longitude/latitude,
    /// in ascending order.
    pub fn codes_at(&self, lon: f64, lat: f64) -> Vec<u32> {
        let mut codes: Vec<u32> = self
            .lock()
            .iter()
            .filter(|(_, crs)| crs.contains(lon, lat))
            .map(|(&code, _)| code)
            .collect();
        codes.sort_unstable();
        codes
    }

    pub fn all_codes(&self) -> Vec<u32> {
        let mut codes: Vec<u32> = self.lock().keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Conversion between two registered codes. Unknown codes yield NaN.
    pub fn transform(&self, from: u32, to: u32) -> Func {
        pipeline::transform(&self.code(from), &self.code(to))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u32, Crs>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A registry pre-filled with the built-in EPSG definitions.
    pub fn with_epsg_defaults() -> Self {
        let registry = Self::new();

        let wgs84 = Crs::geographic(Ellipsoid::wgs84()).with_area(Area::WORLD);
        let etrs89 = Crs::geographic(Ellipsoid::grs80()).with_area(ETRS89_AREA);
        let rgf93 = Crs::geographic(Ellipsoid::grs80()).with_area(RGF93_AREA);
        let nad83 = Crs::geographic(Ellipsoid::grs80()).with_area(NAD83_AREA);
        let irenet95 = Crs::geographic(Ellipsoid::grs80()).with_area(IRENET95_AREA);
        let osgb36 = Crs::geographic(Ellipsoid::airy())
            .with_datum(Helmert::new(
                446.448, -125.157, 542.06, 0.15, 0.247, 0.842, -20.489,
            ))
            .with_area(OSGB36_AREA);
        let mgi = Crs::geographic(Ellipsoid::bessel())
            .with_datum(Helmert::new(
                577.326, 90.129, 463.919, 5.137, 1.474, 5.297, 2.4232,
            ))
            .with_area(MGI_AREA);
        let dhdn = Crs::geographic(Ellipsoid::bessel())
            .with_datum(Helmert::new(
                598.1, 73.7, 418.2, 0.202, 0.045, -2.455, 6.7,
            ))
            .with_area(DHDN_AREA);
        let ed50 = Crs::geographic(Ellipsoid::international())
            .with_datum(Helmert::translation(-87.0, -98.0, -121.0))
            .with_area(ED50_AREA);
        let sjtsk = Crs::geographic(Ellipsoid::bessel())
            .with_datum(Helmert::translation(589.0, 76.0, 480.0))
            .with_area(SJTSK_AREA);

        let web_mercator = Crs::projected(Ellipsoid::wgs84(), ProjectionParams::WebMercator)
            .with_area(Area::new(-180.0, -85.06, 180.0, 85.06));

        registry.add(4326, wgs84.clone());
        registry.add(4978, Crs::geocentric(Ellipsoid::wgs84()).with_area(Area::WORLD));
        registry.add(3857, web_mercator.clone());
        registry.add(3875, web_mercator.clone());
        registry.add(900913, web_mercator);
        registry.add(4258, etrs89.clone());
        registry.add(4171, rgf93.clone());
        registry.add(4269, nad83.clone());
        registry.add(4277, osgb36.clone());
        registry.add(4312, mgi.clone());
        registry.add(4314, dhdn.clone());
        registry.add(4230, ed50.clone());
        registry.add(4156, sjtsk.clone());

        // France: Lambert-93 and the conic conformal zones CC42..CC50
        registry.add(
            2154,
            rgf93.to_projected(ProjectionParams::LambertConformalConic2Sp(
                LambertConformalConic2SpParams {
                    lon0: 3.0,
                    lat0: 46.5,
                    lat1: 49.0,
                    lat2: 44.0,
                    false_easting: 700_000.0,
                    false_northing: 6_600_000.0,
                },
            )),
        );
        for zone in 42..=50u32 {
            let lat0 = f64::from(zone);
            let crs = rgf93
                .to_projected(ProjectionParams::LambertConformalConic2Sp(
                    LambertConformalConic2SpParams {
                        lon0: 3.0,
                        lat0,
                        lat1: lat0 - 0.75,
                        lat2: lat0 + 0.75,
                        false_easting: 1_700_000.0,
                        false_northing: f64::from(zone - 41) * 1_000_000.0 + 200_000.0,
                    },
                ))
                .with_area(Area::new(
                    RGF93_AREA.west,
                    lat0 - 1.0,
                    RGF93_AREA.east,
                    lat0 + 1.0,
                ));
            registry.add(3900 + zone, crs);
        }

        // Ireland
        registry.add(
            2157,
            irenet95.to_projected(ProjectionParams::TransverseMercator(
                TransverseMercatorParams {
                    lon0: -8.0,
                    lat0: 53.5,
                    scale: 0.999_82,
                    false_easting: 600_000.0,
                    false_northing: 750_000.0,
                },
            )),
        );
        registry.add(
            2158,
            irenet95.to_projected(ProjectionParams::TransverseMercator(
                TransverseMercatorParams::utm(29, true),
            )),
        );

        // Europe
        registry.add(
            3035,
            etrs89.to_projected(ProjectionParams::LambertAzimuthalEqualArea(
                LambertAzimuthalEqualAreaParams {
                    lon0: 10.0,
                    lat0: 52.0,
                    false_easting: 4_321_000.0,
                    false_northing: 3_210_000.0,
                },
            )),
        );
        for zone in 28..=38u8 {
            let crs = etrs89
                .to_projected(ProjectionParams::TransverseMercator(
                    TransverseMercatorParams::utm(zone, true),
                ))
                .with_area(Area::new(
                    f64::from(zone) * 6.0 - 186.0,
                    ETRS89_AREA.south,
                    f64::from(zone) * 6.0 - 180.0,
                    ETRS89_AREA.north,
                ));
            registry.add(25800 + u32::from(zone), crs);
        }
        registry.add(
            23090,
            ed50.to_projected(ProjectionParams::TransverseMercator(
                TransverseMercatorParams {
                    lon0: 0.0,
                    lat0: 0.0,
                    scale: 0.9996,
                    false_easting: 500_000.0,
                    false_northing: 0.0,
                },
            ))
            .with_area(Area::new(-6.0, ED50_AREA.south, 6.0, ED50_AREA.north)),
        );

        // Great Britain
        registry.add(
            27700,
            osgb36.to_projected(ProjectionParams::TransverseMercator(
                TransverseMercatorParams {
                    lon0: -2.0,
                    lat0: 49.0,
                    scale: 0.999_601_271_7,
                    false_easting: 400_000.0,
                    false_northing: -100_000.0,
                },
            )),
        );

        // Austria
        let austria_lambert = LambertConformalConic2SpParams {
            lon0: 13.0 + 20.0 / 60.0,
            lat0: 47.5,
            lat1: 49.0,
            lat2: 46.0,
            false_easting: 400_000.0,
            false_northing: 400_000.0,
        };
        registry.add(
            3416,
            etrs89
                .to_projected(ProjectionParams::LambertConformalConic2Sp(austria_lambert))
                .with_area(MGI_AREA),
        );
        registry.add(
            31287,
            mgi.to_projected(ProjectionParams::LambertConformalConic2Sp(austria_lambert)),
        );
        for (i, lon0) in [28.0, 31.0, 34.0].into_iter().enumerate() {
            let offset = i as u32;
            let lon0 = lon0 - 17.0 - 40.0 / 60.0;
            let false_easting = 150_000.0 + 300_000.0 * i as f64;
            let gk = |false_northing| {
                mgi.to_projected(ProjectionParams::TransverseMercator(
                    TransverseMercatorParams {
                        lon0,
                        lat0: 0.0,
                        scale: 1.0,
                        false_easting,
                        false_northing,
                    },
                ))
            };
            registry.add(31257 + offset, gk(-5_000_000.0));
            registry.add(31284 + offset, gk(0.0));
        }

        // Germany: Gauss-Krüger zones 2..5
        for zone in 2..=5u8 {
            let lon0 = f64::from(zone) * 3.0;
            let crs = dhdn
                .to_projected(ProjectionParams::TransverseMercator(
                    TransverseMercatorParams::gauss_kruger(zone),
                ))
                .with_area(Area::new(
                    lon0 - 1.5,
                    DHDN_AREA.south,
                    lon0 + 1.5,
                    DHDN_AREA.north,
                ));
            registry.add(31464 + u32::from(zone), crs);
        }

        // Czech Republic and Slovakia
        registry.add(
            5514,
            sjtsk.to_projected(ProjectionParams::Krovak(KrovakParams {
                lon0: 24.0 + 50.0 / 60.0,
                lat_c: 49.5,
                azimuth: 30.288_139_752_777_8,
                pseudo_standard_parallel: 78.5,
                scale: 0.9999,
                false_easting: 0.0,
                false_northing: 0.0,
            })),
        );

        // North America
        registry.add(
            3161,
            nad83.to_projected(ProjectionParams::LambertConformalConic2Sp(
                LambertConformalConic2SpParams {
                    lon0: -85.0,
                    lat0: 0.0,
                    lat1: 44.5,
                    lat2: 53.5,
                    false_easting: 930_000.0,
                    false_northing: 6_430_000.0,
                },
            )),
        );
        let alabama = |lon0: f64, lat0: f64, scale: f64, false_easting: f64, area: Area| {
            nad83
                .to_projected(ProjectionParams::TransverseMercator(
                    TransverseMercatorParams {
                        lon0,
                        lat0,
                        scale,
                        false_easting,
                        false_northing: 0.0,
                    },
                ))
                .with_area(area)
        };
        registry.add(
            6355,
            alabama(
                -(85.0 + 50.0 / 60.0),
                30.5,
                0.999_96,
                200_000.0,
                Area::new(-86.79, 30.99, -84.89, 35.0),
            ),
        );
        registry.add(
            6356,
            alabama(
                -87.5,
                30.0,
                0.999_933_333,
                600_000.0,
                Area::new(-88.48, 30.14, -86.3, 35.02),
            ),
        );
        registry.add(
            6414,
            nad83
                .to_projected(ProjectionParams::AlbersEqualArea(AlbersEqualAreaParams {
                    lon0: -120.0,
                    lat0: 0.0,
                    lat1: 34.0,
                    lat2: 40.5,
                    false_easting: 0.0,
                    false_northing: -4_000_000.0,
                }))
                .with_area(Area::new(-124.45, 32.53, -114.12, 42.01)),
        );

        // WGS84 / UTM
        for zone in 1..=60u8 {
            let west = f64::from(zone) * 6.0 - 186.0;
            let east = west + 6.0;
            registry.add(
                32600 + u32::from(zone),
                wgs84
                    .to_projected(ProjectionParams::TransverseMercator(
                        TransverseMercatorParams::utm(zone, true),
                    ))
                    .with_area(Area::new(west, 0.0, east, 84.0)),
            );
            registry.add(
                32700 + u32::from(zone),
                wgs84
                    .to_projected(ProjectionParams::TransverseMercator(
                        TransverseMercatorParams::utm(zone, false),
                    ))
                    .with_area(Area::new(west, -80.0, east, 0.0)),
            );
        }

        debug!("registry loaded with {} EPSG codes", registry.len());
        registry
    }
}

const ETRS89_AREA: Area = Area {
    west: -16.1,
    south: 32.88,
    east: 40.18,
    north: 84.17,
};
const RGF93_AREA: Area = Area {
    west: -9.86,
    south: 41.15,
    east: 10.38,
    north: 51.56,
};
const NAD83_AREA: Area = Area {
    west: -172.54,
    south: 23.81,
    east: -47.74,
    north: 86.46,
};
const IRENET95_AREA: Area = Area {
    west: -10.56,
    south: 51.39,
    east: -5.34,
    north: 55.43,
};
const OSGB36_AREA: Area = Area {
    west: -8.82,
    south: 49.79,
    east: 1.92,
    north: 60.94,
};
const MGI_AREA: Area = Area {
    west: 9.53,
    south: 46.4,
    east: 17.17,
    north: 49.02,
};
const DHDN_AREA: Area = Area {
    west: 5.87,
    south: 47.27,
    east: 13.84,
    north: 55.09,
};
const ED50_AREA: Area = Area {
    west: -16.1,
    south: 25.71,
    east: 48.61,
    north: 84.73,
};
const SJTSK_AREA: Area = Area {
    west: 12.09,
    south: 47.73,
    east: 22.56,
    north: 51.06,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::crs::CrsKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_unknown_code_is_invalid() {
        let registry = Registry::new();
        assert!(registry.get(4326).is_none());
        assert!(matches!(
            registry.try_code(4326),
            Err(ProjError::UnknownCrs(ref name)) if name == "EPSG:4326"
        ));
        assert!(!registry.code(4326).is_valid());
        let (a, b, c) = registry.transform(4326, 1234).call(1.0, 2.0, 3.0);
        assert!(a.is_nan() && b.is_nan() && c.is_nan());
    }

    #[test]
    fn test_add_replaces() {
        let registry = Registry::new();
        registry.add(1, Crs::geographic(Ellipsoid::wgs84()));
        registry.add(1, Crs::geocentric(Ellipsoid::wgs84()));
        assert_eq!(registry.len(), 1);
        assert!(matches!(registry.code(1).kind(), CrsKind::Geocentric));
    }

    #[test]
    fn test_defaults_cover_listed_ranges() {
        let registry = Registry::with_epsg_defaults();
        for code in [
            4326, 4978, 3857, 3875, 900913, 2154, 3161, 3942, 3950, 27700, 5514, 6414,
        ] {
            assert!(registry.get(code).is_some(), "missing {code}");
        }
        for code in (32601..=32660).chain(32701..=32760).chain(25828..=25838) {
            assert!(registry.get(code).is_some(), "missing {code}");
        }
        for code in (31257..=31259).chain(31284..=31287).chain(31466..=31469) {
            assert!(registry.get(code).is_some(), "missing {code}");
        }
        assert!(registry.get(3941).is_none());
        assert!(registry.get(32661).is_none());
    }

    #[test]
    fn test_codes_at_london() {
        let registry = Registry::with_epsg_defaults();
        let codes = registry.codes_at(-0.1, 51.5);
        for code in [4326, 4277, 27700, 32630, 25830, 3857] {
            assert!(codes.contains(&code), "{code} not in {codes:?}");
        }
        assert!(!codes.contains(&32631));
        assert!(!codes.contains(&32730));
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_codes_at_rejects_invalid_coordinates() {
        let registry = Registry::with_epsg_defaults();
        assert!(registry.codes_at(200.0, 0.0).is_empty());
    }

    #[test]
    fn test_lambert93_origin() {
        let registry = Registry::with_epsg_defaults();
        let (x, y, _) = registry.transform(4171, 2154).call(3.0, 46.5, 0.0);
        assert_relative_eq!(x, 700_000.0, epsilon = 1e-3);
        assert_relative_eq!(y, 6_600_000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_web_mercator_aliases_agree() {
        let registry = Registry::with_epsg_defaults();
        let expected = registry.transform(4326, 3857).call(12.5, 41.9, 0.0);
        for code in [3875, 900913] {
            let (x, y, _) = registry.transform(4326, code).call(12.5, 41.9, 0.0);
            assert_relative_eq!(x, expected.0, epsilon = 1e-6);
            assert_relative_eq!(y, expected.1, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ontario_lambert_central_meridian() {
        let registry = Registry::with_epsg_defaults();
        assert!(registry.codes_at(-79.4, 43.7).contains(&3161));
        let (x, _, _) = registry.transform(4269, 3161).call(-85.0, 50.0, 0.0);
        assert_relative_eq!(x, 930_000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_gauss_kruger_zone_prefix() {
        let registry = Registry::with_epsg_defaults();
        let (x, _, _) = registry.transform(4314, 31467).call(9.0, 50.0, 0.0);
        // DHDN to the hub and back carries the negated-parameter residual
        assert_relative_eq!(x, 3_500_000.0, epsilon = 0.05);
    }
}
