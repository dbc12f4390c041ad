use criterion::{black_box, criterion_group, criterion_main, Criterion};
use station_graph::geometry::{Polyline, Pos};
use station_graph::models::Station;
use station_graph::topology::railway_next_stations;

fn synthetic_line(station_count: usize) -> (Vec<Polyline>, Vec<Station>) {
    let mut path: Polyline = Vec::with_capacity(station_count);
    let mut stations = Vec::with_capacity(station_count);
    for i in 0..station_count {
        #[allow(clippy::cast_precision_loss)]
        let pos = Pos::new(i as f64, (i % 7) as f64 * 0.01);
        path.push(pos);
        stations.push(Station {
            code: 1000 + u32::try_from(i).expect("small index"),
            railway_id: 1,
            name: format!("S{i}"),
            platforms: vec![vec![pos]],
        });
    }
    (vec![path], stations)
}

fn synthetic_ring(station_count: usize) -> (Vec<Polyline>, Vec<Station>) {
    let mut path: Polyline = Vec::with_capacity(station_count + 1);
    let mut stations = Vec::with_capacity(station_count);
    for i in 0..station_count {
        #[allow(clippy::cast_precision_loss)]
        let angle = i as f64 / station_count as f64 * std::f64::consts::TAU;
        let pos = Pos::new(angle.cos() * 100.0, angle.sin() * 100.0);
        path.push(pos);
        stations.push(Station {
            code: 2000 + u32::try_from(i).expect("small index"),
            railway_id: 2,
            name: format!("R{i}"),
            platforms: vec![vec![pos]],
        });
    }
    path.push(path[0]);
    (vec![path], stations)
}

fn benchmark_next_stations(c: &mut Criterion) {
    let (line_paths, line_stations) = synthetic_line(200);
    let line_refs: Vec<&Station> = line_stations.iter().collect();
    c.bench_function("railway_pass_line_200", |b| {
        b.iter(|| railway_next_stations(black_box(&line_paths), black_box(&line_refs)));
    });

    let (ring_paths, ring_stations) = synthetic_ring(200);
    let ring_refs: Vec<&Station> = ring_stations.iter().collect();
    c.bench_function("railway_pass_ring_200", |b| {
        b.iter(|| railway_next_stations(black_box(&ring_paths), black_box(&ring_refs)));
    });
}

criterion_group!(benches, benchmark_next_stations);
criterion_main!(benches);
