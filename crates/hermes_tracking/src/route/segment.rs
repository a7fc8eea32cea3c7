use jiff::SignedDuration;

use crate::{
    define_index_newtype,
    error::{Result, TrackingError},
    geometry::polyline::Polyline,
    meters::Meters,
    route::maneuver::ManeuverType,
};

define_index_newtype!(SegmentIdx, Segment);

/// Travel between two consecutive maneuvers.
#[derive(Debug, Clone)]
pub struct Segment {
    geometry: Polyline,
    length: Meters,
    duration: SignedDuration,
    maneuver_type: ManeuverType,
    text: String,
}

impl Segment {
    pub fn new(
        geometry: Polyline,
        length: Meters,
        duration: SignedDuration,
        maneuver_type: ManeuverType,
        text: impl Into<String>,
    ) -> Result<Self> {
        if !length.value().is_finite() || length.value() < 0.0 {
            return Err(TrackingError::MalformedRoute(format!(
                "segment length must be a non-negative number, got {}",
                length.value()
            )));
        }

        if duration.is_negative() {
            return Err(TrackingError::MalformedRoute(format!(
                "segment duration must not be negative, got {duration:?}"
            )));
        }

        Ok(Segment {
            geometry,
            length,
            duration,
            maneuver_type,
            text: text.into(),
        })
    }

    pub fn geometry(&self) -> &Polyline {
        &self.geometry
    }

    pub fn length(&self) -> Meters {
        self.length
    }

    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    pub fn maneuver_type(&self) -> &ManeuverType {
        &self.maneuver_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
