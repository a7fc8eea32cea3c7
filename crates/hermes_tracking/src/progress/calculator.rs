use jiff::SignedDuration;
use tracing::warn;

use crate::{
    error::{ProgressInconsistency, Result, TrackingError},
    meters::Meters,
    params::{AggregationScope, FractionMethod, TrackerParams},
    progress::{
        fraction::fraction_remaining,
        state::{NextManeuver, ProgressState},
    },
    route::{
        leg::LegIdx,
        route::Route,
        segment::{Segment, SegmentIdx},
    },
    snap::SnapResult,
};

/// Turns a snap result into remaining distances and times.
#[derive(Clone, Debug)]
pub struct ProgressCalculator {
    aggregation_scope: AggregationScope,
    fraction_method: FractionMethod,
    monotonicity_tolerance: Meters,
    strict_monotonicity: bool,
}

impl ProgressCalculator {
    pub fn new(params: &TrackerParams) -> Self {
        ProgressCalculator {
            aggregation_scope: params.aggregation_scope,
            fraction_method: params.fraction_method,
            monotonicity_tolerance: params.monotonicity_tolerance,
            strict_monotonicity: params.strict_monotonicity,
        }
    }

    /// `previous` is the last computed state, used to verify that the
    /// distance to the destination does not grow.
    pub fn calculate(
        &self,
        route: &Route,
        snap: &SnapResult,
        previous: Option<&ProgressState>,
    ) -> Result<ProgressState> {
        let segment = snap.segment;
        let fraction =
            fraction_remaining(segment.geometry(), &snap.proximity, self.fraction_method)?;

        let distance_to_next_maneuver = segment.length() * fraction;
        let time_to_next_maneuver =
            SignedDuration::from_secs_f64(segment.duration().as_secs_f64() * fraction);

        let later_segments: Vec<&Segment> = self.later_segments(route, snap).collect();
        let later_distance: Meters = later_segments.iter().map(|segment| segment.length()).sum();
        let later_time = later_segments
            .iter()
            .fold(SignedDuration::ZERO, |acc, segment| acc + segment.duration());

        let distance_to_destination = distance_to_next_maneuver + later_distance;
        let time_to_destination = time_to_next_maneuver + later_time;

        let inconsistency =
            self.check_monotonicity(previous, snap.leg_index, distance_to_destination);
        if let Some(inconsistency) = inconsistency {
            if self.strict_monotonicity {
                return Err(TrackingError::ProgressInconsistency(inconsistency));
            }
            warn!("{inconsistency}");
        }

        Ok(ProgressState {
            snapped_location: Some(snap.projected_point()),
            leg_index: snap.leg_index,
            segment_index: snap.segment_index,
            fraction_remaining: fraction,
            distance_to_next_maneuver,
            distance_to_destination,
            time_to_next_maneuver,
            time_to_destination,
            next_maneuver: self.next_maneuver(route, snap),
            inconsistency,
        })
    }

    /// Segments after the current one that still have to be traveled.
    fn later_segments<'a>(
        &self,
        route: &'a Route,
        snap: &SnapResult<'a>,
    ) -> impl Iterator<Item = &'a Segment> {
        let in_leg = &snap.leg.segments()[snap.segment_index.get() + 1..];

        let following_legs = match self.aggregation_scope {
            AggregationScope::CurrentLeg => &route.legs()[..0],
            AggregationScope::EntireRoute => &route.legs()[snap.leg_index.get() + 1..],
        };

        in_leg
            .iter()
            .chain(following_legs.iter().flat_map(|leg| leg.segments().iter()))
    }

    fn next_maneuver(&self, route: &Route, snap: &SnapResult) -> NextManeuver {
        let next_segment_index = snap.segment_index.next();
        if let Some(segment) = snap.leg.segment(next_segment_index) {
            return NextManeuver::Maneuver {
                leg_index: snap.leg_index,
                segment_index: next_segment_index,
                maneuver_type: segment.maneuver_type().clone(),
                text: segment.text().to_string(),
            };
        }

        if self.aggregation_scope == AggregationScope::EntireRoute {
            let next_leg_index = snap.leg_index.next();
            if let Some(segment) = route
                .leg(next_leg_index)
                .and_then(|leg| leg.segments().first())
            {
                return NextManeuver::Maneuver {
                    leg_index: next_leg_index,
                    segment_index: SegmentIdx::new(0),
                    maneuver_type: segment.maneuver_type().clone(),
                    text: segment.text().to_string(),
                };
            }
        }

        NextManeuver::ArrivedAtDestination
    }

    fn check_monotonicity(
        &self,
        previous: Option<&ProgressState>,
        leg_index: LegIdx,
        current: Meters,
    ) -> Option<ProgressInconsistency> {
        let previous = previous?;

        // Moving on to the next leg restarts the countdown.
        if self.aggregation_scope == AggregationScope::CurrentLeg && previous.leg_index != leg_index
        {
            return None;
        }

        if current > previous.distance_to_destination + self.monotonicity_tolerance {
            Some(ProgressInconsistency {
                leg_index,
                previous: previous.distance_to_destination,
                current,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geometry::proximity::Proximity,
        snap::snap,
        test_utils::{self, mercator, minutes},
    };

    use super::*;

    fn calculator() -> ProgressCalculator {
        ProgressCalculator::new(&TrackerParams::default())
    }

    #[test]
    fn start_of_second_segment() {
        let route = test_utils::straight_route(&[100.0, 200.0, 300.0], &[1.0, 2.0, 3.0]);
        let leg = &route.legs()[0];
        let segment = &leg.segments()[1];
        let snap = SnapResult {
            leg_index: LegIdx::new(0),
            segment_index: SegmentIdx::new(1),
            leg,
            segment,
            proximity: Proximity {
                point: mercator(100.0, 0.0),
                part_index: 0,
                vertex_index: 0,
                distance: 0.0,
            },
        };

        let state = calculator().calculate(&route, &snap, None).unwrap();

        assert_eq!(state.fraction_remaining(), 1.0);
        assert_eq!(state.distance_to_next_maneuver(), Meters::new(200.0));
        assert_eq!(state.distance_to_destination(), Meters::new(500.0));
        assert_eq!(state.time_to_next_maneuver(), minutes(2.0));
        assert_eq!(state.time_to_destination(), SignedDuration::from_mins(5));
        assert_eq!(state.next_maneuver().text(), "Maneuver 2");
    }

    #[test]
    fn midpoint_of_first_segment() {
        let route = test_utils::straight_route(&[100.0, 200.0, 300.0], &[1.0, 2.0, 3.0]);
        let snap = snap(&route, &mercator(50.0, 0.0)).unwrap();

        let state = calculator().calculate(&route, &snap, None).unwrap();

        assert_eq!(state.fraction_remaining(), 0.5);
        assert_eq!(state.distance_to_next_maneuver(), Meters::new(50.0));
        assert_eq!(state.distance_to_destination(), Meters::new(550.0));
        assert_eq!(state.time_to_next_maneuver(), SignedDuration::from_secs(30));
        assert_eq!(state.time_to_destination(), SignedDuration::from_secs(330));
        assert_eq!(
            state.next_maneuver(),
            &NextManeuver::Maneuver {
                leg_index: LegIdx::new(0),
                segment_index: SegmentIdx::new(1),
                maneuver_type: crate::route::maneuver::ManeuverType::new("maneuver-1"),
                text: "Maneuver 1".to_string(),
            }
        );
    }

    #[test]
    fn destination_is_next_maneuver_plus_later_segments() {
        let route = test_utils::straight_route(&[120.5, 80.25, 33.3, 410.0], &[1.2, 0.7, 0.3, 4.0]);

        for x in [0.0, 17.0, 120.5, 151.1, 200.75, 222.0, 500.0, 644.05] {
            let snap = snap(&route, &mercator(x, 3.0)).unwrap();
            let state = calculator().calculate(&route, &snap, None).unwrap();

            let later: Meters = snap.leg.segments()[snap.segment_index.get() + 1..]
                .iter()
                .map(|segment| segment.length())
                .sum();
            assert_eq!(
                state.distance_to_destination(),
                state.distance_to_next_maneuver() + later
            );
        }
    }

    #[test]
    fn last_segment_of_the_leg_arrives() {
        let route = test_utils::straight_route(&[100.0, 200.0], &[1.0, 2.0]);
        let snap = snap(&route, &mercator(250.0, 0.0)).unwrap();

        let state = calculator().calculate(&route, &snap, None).unwrap();

        assert_eq!(state.next_maneuver(), &NextManeuver::ArrivedAtDestination);
        assert_eq!(state.distance_to_destination(), Meters::new(50.0));
    }

    #[test]
    fn current_leg_scope_ignores_following_legs() {
        let route = test_utils::two_leg_route();
        let snap = snap(&route, &mercator(150.0, 0.0)).unwrap();

        let state = calculator().calculate(&route, &snap, None).unwrap();

        assert_eq!(state.distance_to_destination(), Meters::new(50.0));
        assert!(state.next_maneuver().is_arrival());
    }

    #[test]
    fn entire_route_scope_spans_following_legs() {
        let route = test_utils::two_leg_route();
        let calculator = ProgressCalculator::new(&TrackerParams {
            aggregation_scope: AggregationScope::EntireRoute,
            ..TrackerParams::default()
        });
        let snap = snap(&route, &mercator(150.0, 0.0)).unwrap();

        let state = calculator.calculate(&route, &snap, None).unwrap();

        assert_eq!(state.distance_to_destination(), Meters::new(250.0));
        assert_eq!(state.time_to_destination(), SignedDuration::from_secs(150));
        match state.next_maneuver() {
            NextManeuver::Maneuver {
                leg_index,
                segment_index,
                ..
            } => {
                assert_eq!(*leg_index, LegIdx::new(1));
                assert_eq!(*segment_index, SegmentIdx::new(0));
            }
            NextManeuver::ArrivedAtDestination => panic!("expected the next leg's first maneuver"),
        }
    }

    #[test]
    fn growing_distance_is_flagged() {
        let route = test_utils::straight_route(&[100.0, 200.0, 300.0], &[1.0, 2.0, 3.0]);
        let calculator = calculator();

        let first = snap(&route, &mercator(150.0, 0.0)).unwrap();
        let first = calculator.calculate(&route, &first, None).unwrap();
        assert!(first.inconsistency().is_none());

        let second = snap(&route, &mercator(50.0, 0.0)).unwrap();
        let second = calculator.calculate(&route, &second, Some(&first)).unwrap();

        let inconsistency = second.inconsistency().unwrap();
        assert_eq!(inconsistency.previous, Meters::new(450.0));
        assert_eq!(inconsistency.current, Meters::new(550.0));
    }

    #[test]
    fn growing_distance_fails_in_strict_mode() {
        let route = test_utils::straight_route(&[100.0, 200.0, 300.0], &[1.0, 2.0, 3.0]);
        let calculator = ProgressCalculator::new(&TrackerParams {
            strict_monotonicity: true,
            ..TrackerParams::default()
        });

        let first = snap(&route, &mercator(150.0, 0.0)).unwrap();
        let first = calculator.calculate(&route, &first, None).unwrap();
        let second = snap(&route, &mercator(50.0, 0.0)).unwrap();

        assert!(matches!(
            calculator.calculate(&route, &second, Some(&first)),
            Err(TrackingError::ProgressInconsistency(_))
        ));
    }

    #[test]
    fn changing_leg_restarts_the_check() {
        let route = test_utils::two_leg_route();
        let calculator = calculator();

        let first = snap(&route, &mercator(150.0, 0.0)).unwrap();
        let first = calculator.calculate(&route, &first, None).unwrap();
        let second = snap(&route, &mercator(250.0, 0.0)).unwrap();
        let second = calculator.calculate(&route, &second, Some(&first)).unwrap();

        assert_eq!(second.leg_index(), LegIdx::new(1));
        assert!(second.distance_to_destination() > first.distance_to_destination());
        assert!(second.inconsistency().is_none());
    }
}
