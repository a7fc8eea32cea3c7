use serde::Serialize;
use thiserror::Error;

use crate::{meters::Meters, route::leg::LegIdx};

#[derive(Error, Debug)]
pub enum TrackingError {
    /// The route has no legs, nothing can be tracked against it.
    #[error("Route has no legs to track against")]
    EmptyRoute,
    #[error("Malformed route: {0}")]
    MalformedRoute(String),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Only returned when strict monotonicity is enabled, otherwise the
    /// inconsistency is attached to the published state.
    #[error(transparent)]
    ProgressInconsistency(#[from] ProgressInconsistency),
    #[error("Failed to read route document: {0}")]
    Json(#[from] serde_json::Error),
}

/// The distance to the destination grew between two consecutive samples on the same leg.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize)]
#[error("distance to destination increased from {previous} to {current} on leg {leg_index}")]
pub struct ProgressInconsistency {
    pub leg_index: LegIdx,
    pub previous: Meters,
    pub current: Meters,
}

pub type Result<T> = std::result::Result<T, TrackingError>;
