//! Native projections against proj4rs on the same GRS80 ellipsoid.

use approx::assert_relative_eq;
use proj4rs::Proj;

use datumkit::proj::albers_equal_area::AlbersEqualAreaParams;
use datumkit::proj::lambert_azimuthal::LambertAzimuthalEqualAreaParams;
use datumkit::proj::lambert_conformal::LambertConformalConic2SpParams;
use datumkit::proj::transverse_mercator::TransverseMercatorParams;
use datumkit::{transform, Crs, Ellipsoid, ProjectionParams};

const GEOGRAPHIC: &str = "+proj=longlat +ellps=GRS80 +no_defs";

fn proj4rs_forward(def: &str, lon: f64, lat: f64) -> (f64, f64) {
    let src = Proj::from_proj_string(GEOGRAPHIC).unwrap();
    let dst = Proj::from_proj_string(def).unwrap();
    let mut point = (lon.to_radians(), lat.to_radians());
    proj4rs::transform::transform(&src, &dst, &mut point).unwrap();
    point
}

fn check(params: ProjectionParams, def: &str, points: &[(f64, f64)]) {
    let geographic = Crs::geographic(Ellipsoid::grs80());
    let projected = Crs::projected(Ellipsoid::grs80(), params);
    let fwd = transform(&geographic, &projected);
    let inv = transform(&projected, &geographic);

    for &(lon, lat) in points {
        let (x, y, _) = fwd.call(lon, lat, 0.0);
        let (px, py) = proj4rs_forward(def, lon, lat);
        assert_relative_eq!(x, px, epsilon = 0.01);
        assert_relative_eq!(y, py, epsilon = 0.01);

        let (lon2, lat2, _) = inv.call(px, py, 0.0);
        assert_relative_eq!(lon2, lon, epsilon = 1e-7);
        assert_relative_eq!(lat2, lat, epsilon = 1e-7);
    }
}

#[test]
fn test_native_tmerc_matches_proj4rs() {
    check(
        ProjectionParams::TransverseMercator(TransverseMercatorParams {
            lon0: -8.0,
            lat0: 53.5,
            scale: 0.999_82,
            false_easting: 600_000.0,
            false_northing: 750_000.0,
        }),
        "+proj=tmerc +lat_0=53.5 +lon_0=-8 +k=0.99982 +x_0=600000 +y_0=750000 +ellps=GRS80 +units=m +no_defs",
        &[(-8.0, 53.5), (-6.3, 53.35), (-9.05, 51.9), (-7.2, 55.1)],
    );
}

#[test]
fn test_native_lcc_matches_proj4rs() {
    check(
        ProjectionParams::LambertConformalConic2Sp(LambertConformalConic2SpParams {
            lon0: 3.0,
            lat0: 46.5,
            lat1: 49.0,
            lat2: 44.0,
            false_easting: 700_000.0,
            false_northing: 6_600_000.0,
        }),
        "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 +y_0=6600000 +ellps=GRS80 +units=m +no_defs",
        &[(2.35, 48.86), (-4.48, 48.39), (7.75, 48.58), (5.37, 43.3)],
    );
}

#[test]
fn test_native_aea_matches_proj4rs() {
    check(
        ProjectionParams::AlbersEqualArea(AlbersEqualAreaParams {
            lon0: -120.0,
            lat0: 0.0,
            lat1: 34.0,
            lat2: 40.5,
            false_easting: 0.0,
            false_northing: -4_000_000.0,
        }),
        "+proj=aea +lat_0=0 +lon_0=-120 +lat_1=34 +lat_2=40.5 +x_0=0 +y_0=-4000000 +ellps=GRS80 +units=m +no_defs",
        &[(-122.4, 37.8), (-118.25, 34.05), (-121.5, 38.58), (-124.2, 41.75)],
    );
}

#[test]
fn test_native_laea_matches_proj4rs() {
    check(
        ProjectionParams::LambertAzimuthalEqualArea(LambertAzimuthalEqualAreaParams {
            lon0: 10.0,
            lat0: 52.0,
            false_easting: 4_321_000.0,
            false_northing: 3_210_000.0,
        }),
        "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs",
        &[(5.0, 50.0), (-3.7, 40.4), (24.9, 60.2), (10.0, 52.0)],
    );
}
