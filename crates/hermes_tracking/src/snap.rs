use crate::{
    error::{Result, TrackingError},
    geometry::{
        point::Point,
        polyline::Polyline,
        proximity::{Proximity, nearest_point_on_polyline},
    },
    route::{
        leg::{Leg, LegIdx},
        route::Route,
        segment::{Segment, SegmentIdx},
    },
};

/// Where a location lands on the route.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult<'a> {
    pub leg_index: LegIdx,
    pub segment_index: SegmentIdx,
    pub leg: &'a Leg,
    pub segment: &'a Segment,
    pub proximity: Proximity,
}

impl<'a> SnapResult<'a> {
    pub fn segment_polyline(&self) -> &'a Polyline {
        self.segment.geometry()
    }

    pub fn projected_point(&self) -> Point {
        self.proximity.point
    }

    pub fn vertex_index(&self) -> usize {
        self.proximity.vertex_index
    }

    pub fn distance(&self) -> f64 {
        self.proximity.distance
    }
}

/// Snaps `location` to the closest segment of the whole route.
///
/// Every segment is scanned on each call. Ties resolve to the earliest leg,
/// then to the earliest segment.
pub fn snap<'a>(route: &'a Route, location: &Point) -> Result<SnapResult<'a>> {
    if route.is_empty() {
        return Err(TrackingError::EmptyRoute);
    }

    let mut best: Option<SnapResult<'a>> = None;

    for (leg_index, leg) in route.legs().iter().enumerate() {
        let Some(candidate) = snap_to_leg(LegIdx::new(leg_index), leg, location)? else {
            continue;
        };

        if best.is_none_or(|best| candidate.distance() < best.distance()) {
            best = Some(candidate);
        }
    }

    best.ok_or(TrackingError::EmptyRoute)
}

fn snap_to_leg<'a>(
    leg_index: LegIdx,
    leg: &'a Leg,
    location: &Point,
) -> Result<Option<SnapResult<'a>>> {
    let mut best: Option<SnapResult<'a>> = None;

    for (segment_index, segment) in leg.segments().iter().enumerate() {
        let proximity = nearest_point_on_polyline(segment.geometry(), location)?;

        if best.is_none_or(|best| proximity.distance < best.distance()) {
            best = Some(SnapResult {
                leg_index,
                segment_index: SegmentIdx::new(segment_index),
                leg,
                segment,
                proximity,
            });
        }
    }

    Ok(best)
}
