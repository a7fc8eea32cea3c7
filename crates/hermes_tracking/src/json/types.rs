use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{
    error::{Result, TrackingError},
    geometry::{point::SpatialReference, polyline::Polyline},
    meters::Meters,
    route::{leg::Leg, maneuver::ManeuverType, route::Route, segment::Segment},
};

/// Route as returned by a route solving service.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Route")]
pub struct JsonRoute {
    pub spatial_reference: SpatialReference,
    pub legs: Vec<JsonLeg>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Leg")]
pub struct JsonLeg {
    pub segments: Vec<JsonSegment>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Segment")]
pub struct JsonSegment {
    pub geometry: JsonPolyline,

    /// Expected keys are `length` in meters, `time` in minutes, `maneuverType`
    /// and `text`. Other keys are ignored.
    pub attributes: Map<String, Value>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Polyline")]
pub struct JsonPolyline {
    pub paths: Vec<Vec<[f64; 2]>>,
}

impl JsonRoute {
    #[instrument(skip_all, level = "debug")]
    pub fn build_route(self, contiguity_tolerance: f64) -> Result<Route> {
        let spatial_reference = self.spatial_reference;

        let legs = self
            .legs
            .into_iter()
            .enumerate()
            .map(|(leg_index, leg)| {
                let segments = leg
                    .segments
                    .into_iter()
                    .enumerate()
                    .map(|(segment_index, segment)| {
                        segment.build_segment(spatial_reference).map_err(|error| {
                            with_context(error, format!("leg {leg_index}, segment {segment_index}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Leg::new(segments, contiguity_tolerance)
                    .map_err(|error| with_context(error, format!("leg {leg_index}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let route = Route::new(legs)?;
        debug!(
            legs = route.legs().len(),
            length = %route.length(),
            "Built route"
        );

        Ok(route)
    }
}

impl JsonSegment {
    fn build_segment(self, spatial_reference: SpatialReference) -> Result<Segment> {
        let length = number_attribute(&self.attributes, "length")?;
        let minutes = number_attribute(&self.attributes, "time")?;
        let maneuver_type = string_attribute(&self.attributes, "maneuverType")?;
        let text = string_attribute(&self.attributes, "text")?;

        let duration = SignedDuration::try_from_secs_f64(minutes * 60.0).map_err(|_| {
            TrackingError::MalformedRoute(format!("time {minutes} is not a valid duration"))
        })?;

        let geometry = Polyline::from_coords(self.geometry.paths, spatial_reference)?;

        Segment::new(
            geometry,
            Meters::new(length),
            duration,
            ManeuverType::new(maneuver_type),
            text,
        )
    }
}

/// Document problems are all reported as a malformed route, located by `context`.
fn with_context(error: TrackingError, context: String) -> TrackingError {
    match error {
        TrackingError::MalformedRoute(message) | TrackingError::InvalidGeometry(message) => {
            TrackingError::MalformedRoute(format!("{context}: {message}"))
        }
        other => other,
    }
}

fn number_attribute(attributes: &Map<String, Value>, key: &str) -> Result<f64> {
    match attributes.get(key) {
        Some(value) => value.as_f64().ok_or_else(|| {
            TrackingError::MalformedRoute(format!("attribute `{key}` is not a number: {value}"))
        }),
        None => Err(TrackingError::MalformedRoute(format!(
            "missing attribute `{key}`"
        ))),
    }
}

fn string_attribute<'a>(attributes: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match attributes.get(key) {
        Some(value) => value.as_str().ok_or_else(|| {
            TrackingError::MalformedRoute(format!("attribute `{key}` is not a string: {value}"))
        }),
        None => Err(TrackingError::MalformedRoute(format!(
            "missing attribute `{key}`"
        ))),
    }
}
