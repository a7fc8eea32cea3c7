use jiff::SignedDuration;

use crate::{
    geometry::{
        point::{Point, SpatialReference},
        polyline::Polyline,
    },
    meters::Meters,
    route::{
        leg::{DEFAULT_CONTIGUITY_TOLERANCE, Leg},
        maneuver::ManeuverType,
        route::Route,
        segment::Segment,
    },
};

pub fn mercator(x: f64, y: f64) -> Point {
    Point::new(x, y, SpatialReference::WEB_MERCATOR)
}

pub fn minutes(value: f64) -> SignedDuration {
    SignedDuration::from_secs_f64(value * 60.0)
}

pub fn straight_segment(start: [f64; 2], end: [f64; 2], duration_minutes: f64) -> Segment {
    let geometry =
        Polyline::from_coords(vec![vec![start, end]], SpatialReference::WEB_MERCATOR).unwrap();
    let length = geometry.length();

    Segment::new(
        geometry,
        Meters::new(length),
        minutes(duration_minutes),
        ManeuverType::new("esriDMTStraight"),
        format!("Continue for {length} m"),
    )
    .unwrap()
}

/// Segments laid end to end along the x axis, starting at `x_offset`.
pub fn straight_segments(x_offset: f64, lengths: &[f64], durations: &[f64]) -> Vec<Segment> {
    let mut x = x_offset;
    lengths
        .iter()
        .zip(durations)
        .enumerate()
        .map(|(index, (&length, &duration))| {
            let geometry = Polyline::from_coords(
                vec![vec![[x, 0.0], [x + length, 0.0]]],
                SpatialReference::WEB_MERCATOR,
            )
            .unwrap();
            x += length;

            Segment::new(
                geometry,
                Meters::new(length),
                minutes(duration),
                ManeuverType::new(format!("maneuver-{index}")),
                format!("Maneuver {index}"),
            )
            .unwrap()
        })
        .collect()
}

pub fn straight_leg(lengths: &[f64], durations: &[f64]) -> Leg {
    Leg::new(
        straight_segments(0.0, lengths, durations),
        DEFAULT_CONTIGUITY_TOLERANCE,
    )
    .unwrap()
}

pub fn straight_route(lengths: &[f64], durations: &[f64]) -> Route {
    Route::new(vec![straight_leg(lengths, durations)]).unwrap()
}

/// Two legs of two 100 m, one minute segments each, along the x axis.
pub fn two_leg_route() -> Route {
    let first = Leg::new(
        straight_segments(0.0, &[100.0, 100.0], &[1.0, 1.0]),
        DEFAULT_CONTIGUITY_TOLERANCE,
    )
    .unwrap();
    let second = Leg::new(
        straight_segments(200.0, &[100.0, 100.0], &[1.0, 1.0]),
        DEFAULT_CONTIGUITY_TOLERANCE,
    )
    .unwrap();

    Route::new(vec![first, second]).unwrap()
}
