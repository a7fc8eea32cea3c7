use jiff::SignedDuration;
use serde::Serialize;

use crate::{
    error::ProgressInconsistency,
    geometry::point::Point,
    meters::Meters,
    progress::format::format_imperial,
    route::{leg::LegIdx, maneuver::ManeuverType, segment::SegmentIdx},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextManeuver {
    Maneuver {
        leg_index: LegIdx,
        segment_index: SegmentIdx,
        maneuver_type: ManeuverType,
        text: String,
    },
    /// The current segment is the last one before the destination.
    ArrivedAtDestination,
}

impl NextManeuver {
    pub fn text(&self) -> &str {
        match self {
            NextManeuver::Maneuver { text, .. } => text,
            NextManeuver::ArrivedAtDestination => "Arrive at destination",
        }
    }

    pub fn maneuver_type(&self) -> Option<&ManeuverType> {
        match self {
            NextManeuver::Maneuver { maneuver_type, .. } => Some(maneuver_type),
            NextManeuver::ArrivedAtDestination => None,
        }
    }

    pub fn is_arrival(&self) -> bool {
        matches!(self, NextManeuver::ArrivedAtDestination)
    }
}

/// Observable fields of [`ProgressState`], reported when they change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressField {
    SnappedLocation,
    LegIndex,
    SegmentIndex,
    FractionRemaining,
    DistanceToNextManeuver,
    DistanceToDestination,
    TimeToNextManeuver,
    TimeToDestination,
    NextManeuver,
    ManeuverType,
    Inconsistency,
}

impl ProgressField {
    pub const ALL: [ProgressField; 11] = [
        ProgressField::SnappedLocation,
        ProgressField::LegIndex,
        ProgressField::SegmentIndex,
        ProgressField::FractionRemaining,
        ProgressField::DistanceToNextManeuver,
        ProgressField::DistanceToDestination,
        ProgressField::TimeToNextManeuver,
        ProgressField::TimeToDestination,
        ProgressField::NextManeuver,
        ProgressField::ManeuverType,
        ProgressField::Inconsistency,
    ];
}

/// Navigation values derived from the latest location sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressState {
    pub(crate) snapped_location: Option<Point>,
    pub(crate) leg_index: LegIdx,
    pub(crate) segment_index: SegmentIdx,
    pub(crate) fraction_remaining: f64,
    pub(crate) distance_to_next_maneuver: Meters,
    pub(crate) distance_to_destination: Meters,
    pub(crate) time_to_next_maneuver: SignedDuration,
    pub(crate) time_to_destination: SignedDuration,
    pub(crate) next_maneuver: NextManeuver,
    pub(crate) inconsistency: Option<ProgressInconsistency>,
}

impl ProgressState {
    /// Fixed values for previews, no route is involved.
    pub fn placeholder() -> Self {
        ProgressState {
            snapped_location: None,
            leg_index: LegIdx::new(0),
            segment_index: SegmentIdx::new(0),
            fraction_remaining: 1.0,
            distance_to_next_maneuver: Meters::new(500.0),
            distance_to_destination: Meters::new(1000.0),
            time_to_next_maneuver: SignedDuration::new(3723, 0),
            time_to_destination: SignedDuration::new(7384, 0),
            next_maneuver: NextManeuver::Maneuver {
                leg_index: LegIdx::new(0),
                segment_index: SegmentIdx::new(1),
                maneuver_type: ManeuverType::new("esriDMTTurnRight"),
                text: "Turn right onto Main St.".to_string(),
            },
            inconsistency: None,
        }
    }

    /// `None` only for the placeholder state.
    pub fn snapped_location(&self) -> Option<&Point> {
        self.snapped_location.as_ref()
    }

    pub fn leg_index(&self) -> LegIdx {
        self.leg_index
    }

    pub fn segment_index(&self) -> SegmentIdx {
        self.segment_index
    }

    pub fn fraction_remaining(&self) -> f64 {
        self.fraction_remaining
    }

    pub fn distance_to_next_maneuver(&self) -> Meters {
        self.distance_to_next_maneuver
    }

    pub fn distance_to_destination(&self) -> Meters {
        self.distance_to_destination
    }

    pub fn time_to_next_maneuver(&self) -> SignedDuration {
        self.time_to_next_maneuver
    }

    pub fn time_to_destination(&self) -> SignedDuration {
        self.time_to_destination
    }

    pub fn next_maneuver(&self) -> &NextManeuver {
        &self.next_maneuver
    }

    pub fn inconsistency(&self) -> Option<&ProgressInconsistency> {
        self.inconsistency.as_ref()
    }

    pub fn miles_to_destination(&self) -> String {
        format_imperial(self.distance_to_destination)
    }

    pub fn miles_to_next_maneuver(&self) -> String {
        format_imperial(self.distance_to_next_maneuver)
    }

    /// Distances to the meter and times to the second, for display.
    pub fn rounded(&self) -> ProgressState {
        ProgressState {
            distance_to_next_maneuver: self.distance_to_next_maneuver.round(),
            distance_to_destination: self.distance_to_destination.round(),
            time_to_next_maneuver: round_to_seconds(self.time_to_next_maneuver),
            time_to_destination: round_to_seconds(self.time_to_destination),
            ..self.clone()
        }
    }

    /// Fields that differ from `previous`, every field when there is none.
    pub fn changed_fields(&self, previous: Option<&ProgressState>) -> Vec<ProgressField> {
        let Some(previous) = previous else {
            return ProgressField::ALL.to_vec();
        };

        ProgressField::ALL
            .into_iter()
            .filter(|field| match field {
                ProgressField::SnappedLocation => {
                    self.snapped_location != previous.snapped_location
                }
                ProgressField::LegIndex => self.leg_index != previous.leg_index,
                ProgressField::SegmentIndex => self.segment_index != previous.segment_index,
                ProgressField::FractionRemaining => {
                    self.fraction_remaining != previous.fraction_remaining
                }
                ProgressField::DistanceToNextManeuver => {
                    self.distance_to_next_maneuver != previous.distance_to_next_maneuver
                }
                ProgressField::DistanceToDestination => {
                    self.distance_to_destination != previous.distance_to_destination
                }
                ProgressField::TimeToNextManeuver => {
                    self.time_to_next_maneuver != previous.time_to_next_maneuver
                }
                ProgressField::TimeToDestination => {
                    self.time_to_destination != previous.time_to_destination
                }
                ProgressField::NextManeuver => self.next_maneuver != previous.next_maneuver,
                ProgressField::ManeuverType => {
                    self.next_maneuver.maneuver_type() != previous.next_maneuver.maneuver_type()
                }
                ProgressField::Inconsistency => self.inconsistency != previous.inconsistency,
            })
            .collect()
    }
}

fn round_to_seconds(duration: SignedDuration) -> SignedDuration {
    SignedDuration::from_secs(duration.as_secs_f64().round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_values() {
        let state = ProgressState::placeholder();

        assert_eq!(state.distance_to_destination(), Meters::new(1000.0));
        assert_eq!(state.distance_to_next_maneuver(), Meters::new(500.0));
        assert_eq!(
            state.time_to_next_maneuver(),
            SignedDuration::from_hours(1)
                + SignedDuration::from_mins(2)
                + SignedDuration::from_secs(3)
        );
        assert_eq!(state.next_maneuver().text(), "Turn right onto Main St.");
        assert!(state.snapped_location().is_none());
    }

    #[test]
    fn every_field_changes_without_previous_state() {
        let state = ProgressState::placeholder();
        assert_eq!(state.changed_fields(None), ProgressField::ALL.to_vec());
        assert!(state.changed_fields(Some(&state)).is_empty());
    }

    #[test]
    fn reports_only_changed_fields() {
        let previous = ProgressState::placeholder();
        let current = ProgressState {
            distance_to_destination: Meters::new(900.0),
            next_maneuver: NextManeuver::ArrivedAtDestination,
            ..previous.clone()
        };

        assert_eq!(
            current.changed_fields(Some(&previous)),
            vec![
                ProgressField::DistanceToDestination,
                ProgressField::NextManeuver,
                ProgressField::ManeuverType,
            ]
        );
    }

    #[test]
    fn rounded_for_display() {
        let state = ProgressState {
            distance_to_next_maneuver: Meters::new(49.6),
            time_to_next_maneuver: SignedDuration::from_millis(29_700),
            ..ProgressState::placeholder()
        };

        let rounded = state.rounded();
        assert_eq!(rounded.distance_to_next_maneuver(), Meters::new(50.0));
        assert_eq!(rounded.time_to_next_maneuver(), SignedDuration::from_secs(30));
        assert_eq!(rounded.miles_to_destination(), "0.62 mi");
    }

    #[test]
    fn arrival_has_no_maneuver_type() {
        assert!(NextManeuver::ArrivedAtDestination.maneuver_type().is_none());
        assert!(NextManeuver::ArrivedAtDestination.is_arrival());
    }
}
