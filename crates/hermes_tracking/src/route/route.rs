use jiff::SignedDuration;

use crate::{
    error::{Result, TrackingError},
    geometry::{point::Point, point::SpatialReference, polyline::Polyline},
    meters::Meters,
    route::{
        leg::{Leg, LegIdx},
        segment::{Segment, SegmentIdx},
    },
};

/// A solved route. Never mutated once built.
#[derive(Debug, Clone)]
pub struct Route {
    legs: Vec<Leg>,
}

impl Route {
    /// A route without legs can be built, but cannot be tracked.
    pub fn new(legs: Vec<Leg>) -> Result<Self> {
        if let Some(first) = legs.first() {
            let spatial_reference = first.spatial_reference();
            for (index, leg) in legs.iter().enumerate() {
                if !leg.spatial_reference().is_compatible_with(&spatial_reference) {
                    return Err(TrackingError::MalformedRoute(format!(
                        "leg {} uses spatial reference {} while the route uses {}",
                        index,
                        leg.spatial_reference().wkid(),
                        spatial_reference.wkid()
                    )));
                }
            }
        }

        let total_duration = legs
            .iter()
            .try_fold(SignedDuration::ZERO, |total, leg| total.checked_add(leg.duration()));
        if total_duration.is_none() {
            return Err(TrackingError::MalformedRoute(
                "total duration of the route is out of range".to_string(),
            ));
        }

        Ok(Route { legs })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg(&self, leg_index: LegIdx) -> Option<&Leg> {
        self.legs.get(leg_index.get())
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn spatial_reference(&self) -> Option<SpatialReference> {
        self.legs.first().map(Leg::spatial_reference)
    }

    /// Every segment in route order.
    pub fn segments(&self) -> impl Iterator<Item = (LegIdx, SegmentIdx, &Segment)> {
        self.legs.iter().enumerate().flat_map(|(leg_index, leg)| {
            leg.segments()
                .iter()
                .enumerate()
                .map(move |(segment_index, segment)| {
                    (LegIdx::new(leg_index), SegmentIdx::new(segment_index), segment)
                })
        })
    }

    pub fn length(&self) -> Meters {
        self.legs.iter().map(Leg::length).sum()
    }

    pub fn duration(&self) -> SignedDuration {
        self.legs
            .iter()
            .fold(SignedDuration::ZERO, |acc, leg| acc + leg.duration())
    }

    /// One single part line per leg.
    pub fn route_lines(&self) -> Vec<&Polyline> {
        self.legs.iter().map(Leg::geometry).collect()
    }

    /// Where each maneuver happens: the first vertex of every segment.
    pub fn maneuver_points(&self) -> Vec<Point> {
        self.segments()
            .map(|(_, _, segment)| segment.geometry().first_point())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geometry::point::SpatialReference, route::leg::DEFAULT_CONTIGUITY_TOLERANCE, test_utils,
    };

    use super::*;

    #[test]
    fn empty_route_can_be_built() {
        let route = Route::new(vec![]).unwrap();
        assert!(route.is_empty());
        assert_eq!(route.spatial_reference(), None);
    }

    #[test]
    fn rejects_total_duration_out_of_range() {
        let legs = [0.0, 100.0]
            .into_iter()
            .map(|x_offset| {
                let segments = test_utils::straight_segments(x_offset, &[100.0], &[1e17]);
                Leg::new(segments, DEFAULT_CONTIGUITY_TOLERANCE).unwrap()
            })
            .collect();

        assert!(matches!(
            Route::new(legs),
            Err(TrackingError::MalformedRoute(_))
        ));
    }

    #[test]
    fn segments_are_listed_in_route_order() {
        let route = test_utils::two_leg_route();
        let indices: Vec<(usize, usize)> = route
            .segments()
            .map(|(leg, segment, _)| (leg.get(), segment.get()))
            .collect();

        assert_eq!(indices, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn maneuver_points_and_route_lines() {
        let route = test_utils::two_leg_route();

        let points = route.maneuver_points();
        assert_eq!(points.len(), 4);
        assert_eq!(
            points[2],
            Point::new(200.0, 0.0, SpatialReference::WEB_MERCATOR)
        );

        let lines = route.route_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].length(), 200.0);
    }

    #[test]
    fn totals_span_all_legs() {
        let route = test_utils::two_leg_route();
        assert_eq!(route.length(), Meters::new(400.0));
        assert_eq!(route.duration(), SignedDuration::from_mins(4));
    }
}
