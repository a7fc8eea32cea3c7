use std::{hint::black_box, sync::Arc};

use criterion::{Criterion, criterion_group, criterion_main};
use hermes_tracking::{
    geometry::{
        point::{Point, SpatialReference},
        polyline::Polyline,
    },
    meters::Meters,
    params::{AggregationScope, TrackerParams},
    route::{
        leg::{DEFAULT_CONTIGUITY_TOLERANCE, Leg},
        maneuver::ManeuverType,
        route::Route,
        segment::Segment,
    },
    snap::snap,
    tracker::RouteTracker,
};
use jiff::SignedDuration;

const SEGMENTS_PER_LEG: usize = 250;
const SEGMENT_LENGTH: f64 = 100.0;

/// Legs made of zigzagging segments, each with a midpoint vertex.
fn zigzag_route(legs: usize) -> Route {
    let mut x = 0.0;
    let legs = (0..legs)
        .map(|_| {
            let segments = (0..SEGMENTS_PER_LEG)
                .map(|index| {
                    let offset = if index % 2 == 0 { 10.0 } else { -10.0 };
                    let start = x;
                    x += SEGMENT_LENGTH;
                    let geometry = Polyline::from_coords(
                        vec![vec![
                            [start, 0.0],
                            [start + SEGMENT_LENGTH / 2.0, offset],
                            [x, 0.0],
                        ]],
                        SpatialReference::WEB_MERCATOR,
                    )
                    .unwrap();
                    let length = geometry.length();

                    Segment::new(
                        geometry,
                        Meters::new(length),
                        SignedDuration::from_secs(60),
                        ManeuverType::new("esriDMTStraight"),
                        format!("Continue for {length:.0} m"),
                    )
                    .unwrap()
                })
                .collect();

            Leg::new(segments, DEFAULT_CONTIGUITY_TOLERANCE).unwrap()
        })
        .collect();

    Route::new(legs).unwrap()
}

fn samples(route: &Route, count: usize) -> Vec<Point> {
    let total = route.length().value();
    (0..count)
        .map(|index| {
            let x = total * index as f64 / count as f64;
            Point::new(x, 3.0, SpatialReference::WEB_MERCATOR)
        })
        .collect()
}

fn snap_benchmark(c: &mut Criterion) {
    let route = zigzag_route(2);
    let location = Point::new(37_550.0, 4.0, SpatialReference::WEB_MERCATOR);

    c.bench_function("snap (500 segments)", |b| {
        b.iter(|| snap(black_box(&route), black_box(&location)).unwrap().distance())
    });
}

fn update_benchmark(c: &mut Criterion) {
    let route = Arc::new(zigzag_route(2));
    let samples = samples(&route, 1000);

    c.bench_function("tracker update, current leg", |b| {
        b.iter(|| {
            let mut tracker =
                RouteTracker::new(Arc::clone(&route), TrackerParams::default()).unwrap();
            for sample in &samples {
                black_box(tracker.update(sample).unwrap());
            }
        })
    });

    c.bench_function("tracker update, entire route", |b| {
        b.iter(|| {
            let mut tracker = RouteTracker::new(
                Arc::clone(&route),
                TrackerParams {
                    aggregation_scope: AggregationScope::EntireRoute,
                    ..TrackerParams::default()
                },
            )
            .unwrap();
            for sample in &samples {
                black_box(tracker.update(sample).unwrap());
            }
        })
    });
}

criterion_group!(benches, snap_benchmark, update_benchmark);
criterion_main!(benches);
