use criterion::{black_box, criterion_group, criterion_main, Criterion};

use datumkit::{Pipeline, Registry};

fn make_points(count: usize, west: f64, south: f64, span: f64) -> Vec<(f64, f64, f64)> {
    let side = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let lon = west + span * (i % side) as f64 / side as f64;
            let lat = south + span * (i / side) as f64 / side as f64;
            (lon, lat, 0.0)
        })
        .collect()
}

fn bench_single(c: &mut Criterion) {
    let registry = Registry::with_epsg_defaults();
    let cases = [
        ("wgs84_to_utm33", 4326, 32633, (15.0, 52.0)),
        ("wgs84_to_bng", 4326, 27700, (-1.5, 52.5)),
        ("wgs84_to_laea", 4326, 3035, (5.0, 50.0)),
        ("wgs84_to_krovak", 4326, 5514, (16.85, 50.2)),
        ("wgs84_to_lambert93", 4326, 2154, (2.35, 48.86)),
    ];
    for (name, from, to, (lon, lat)) in cases {
        let f = registry.transform(from, to);
        c.bench_function(name, |b| {
            b.iter(|| black_box(f.call(black_box(lon), black_box(lat), 0.0)))
        });
    }
}

fn bench_batch(c: &mut Criterion) {
    let registry = Registry::with_epsg_defaults();
    let sizes = [1_000, 10_000, 100_000];
    for &size in &sizes {
        let pipeline = Pipeline::new(&registry.code(4326), &registry.code(27700));
        let points = make_points(size, -5.0, 50.0, 6.0);

        c.bench_function(&format!("batch_wgs84_to_bng_{size}"), |b| {
            b.iter(|| {
                let mut coords = points.clone();
                pipeline.transform_batch(&mut coords);
                black_box(coords)
            });
        });
    }
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
