use approx::assert_relative_eq;

use datumkit::{safe_transform, Area, CrsKind, ProjError, Registry};

fn centre(area: &Area) -> (f64, f64) {
    let lon = if area.west <= area.east {
        (area.west + area.east) / 2.0
    } else {
        let lon = (area.west + area.east + 360.0) / 2.0;
        if lon > 180.0 {
            lon - 360.0
        } else {
            lon
        }
    };
    (lon, (area.south + area.north) / 2.0)
}

#[test]
fn test_hub_roundtrip_every_code() {
    let registry = Registry::with_epsg_defaults();
    for code in registry.all_codes() {
        let crs = registry.code(code);
        let (lon, lat) = centre(crs.area().unwrap_or(&Area::WORLD));
        let there = registry.transform(4326, code);
        let back = registry.transform(code, 4326);

        let (a, b, c) = there.call(lon, lat, 100.0);
        assert!(a.is_finite() && b.is_finite() && c.is_finite(), "EPSG:{code}");
        let (lon2, lat2, h2) = back.call(a, b, c);
        assert_relative_eq!(lon2, lon, epsilon = 1e-6);
        assert_relative_eq!(lat2, lat, epsilon = 1e-6);
        // Helmert datums invert by negation, leaving a centimetre-level residual
        assert!((h2 - 100.0).abs() < 0.05, "EPSG:{code} height {h2}");
    }
}

#[test]
fn test_projected_roundtrip_between_codes() {
    let registry = Registry::with_epsg_defaults();
    // Lambert-93 to UTM 31N and back, both on the hub datum
    let fwd = registry.transform(2154, 32631);
    let inv = registry.transform(32631, 2154);
    let (e, n, h) = fwd.call(652_469.02, 6_862_035.26, 0.0);
    let (x, y, _) = inv.call(e, n, h);
    assert!((x - 652_469.02).abs() < 0.01, "x = {x}");
    assert!((y - 6_862_035.26).abs() < 0.01, "y = {y}");
}

#[test]
fn test_british_national_grid() {
    let registry = Registry::with_epsg_defaults();
    let (e, n, _) = registry.transform(4277, 27700).call(0.5, 50.5, 0.0);
    assert_relative_eq!(e, 577_274.99, epsilon = 0.05);
    assert_relative_eq!(n, 69_740.50, epsilon = 0.05);
}

#[test]
fn test_etrs89_laea() {
    let registry = Registry::with_epsg_defaults();
    let (x, y, _) = registry.transform(4258, 3035).call(5.0, 50.0, 0.0);
    assert_relative_eq!(x, 3_962_799.45, epsilon = 0.01);
    assert_relative_eq!(y, 2_999_718.85, epsilon = 0.01);
}

#[test]
fn test_sjtsk_krovak() {
    let registry = Registry::with_epsg_defaults();
    let lon = 16.0 + 50.0 / 60.0 + 59.179 / 3600.0;
    let lat = 50.0 + 12.0 / 60.0 + 32.442 / 3600.0;
    let (westing, southing, _) = registry.transform(4156, 5514).call(lon, lat, 0.0);
    assert_relative_eq!(westing, 568_991.00, epsilon = 0.01);
    assert_relative_eq!(southing, 1_050_538.63, epsilon = 0.01);
}

#[test]
fn test_rounded_utm() {
    let registry = Registry::with_epsg_defaults();
    let (e, n, h) = registry.transform(4326, 32633).round(2).call(15.0, 52.0, 0.0);
    assert_eq!(e, 500_000.0);
    assert_eq!(n, (n * 100.0).round() / 100.0);
    assert_eq!(h, 0.0);
}

#[test]
fn test_geocentric_code() {
    let registry = Registry::with_epsg_defaults();
    assert!(matches!(registry.code(4978).kind(), CrsKind::Geocentric));
    let (x, y, z) = registry.transform(4326, 4978).call(0.0, 0.0, 0.0);
    assert_relative_eq!(x, 6_378_137.0, epsilon = 1e-6);
    assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(z, 0.0, epsilon = 1e-6);
}

#[test]
fn test_safe_transform_respects_areas() {
    let registry = Registry::with_epsg_defaults();
    let f = safe_transform(&registry.code(4326), &registry.code(27700));
    assert!(f.call(-1.0, 52.0, 0.0).is_ok());
    match f.call(10.0, 50.0, 0.0) {
        Err(ProjError::OutOfBounds { lon, lat }) => {
            assert_relative_eq!(lon, 10.0, epsilon = 1e-9);
            assert_relative_eq!(lat, 50.0, epsilon = 1e-9);
        }
        other => panic!("expected OutOfBounds, got {other:?}"),
    }
}

#[test]
fn test_unknown_code_gives_nan() {
    let registry = Registry::with_epsg_defaults();
    let (a, b, c) = registry.transform(4326, 99_999).call(1.0, 2.0, 3.0);
    assert!(a.is_nan() && b.is_nan() && c.is_nan());
}
