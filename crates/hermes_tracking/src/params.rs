use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::meters::Meters;

/// Which segments count towards the distance and time to the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationScope {
    /// Only the remaining segments of the current leg, the destination is the leg's stop.
    #[default]
    CurrentLeg,
    /// Remaining segments of the current leg and every segment of the following legs.
    EntireRoute,
}

impl FromStr for AggregationScope {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "leg" | "current_leg" => Ok(AggregationScope::CurrentLeg),
            "route" | "entire_route" => Ok(AggregationScope::EntireRoute),
            _ => Err(format!("Invalid aggregation scope: {input}")),
        }
    }
}

/// How the traveled fraction of the current segment is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionMethod {
    /// Infers the current sub-edge from the vertex nearest to the snapped point.
    #[default]
    VertexAnchored,
    /// Uses the sub-edge the snapped point was projected on.
    Parametric,
}

impl FromStr for FractionMethod {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "vertex" | "vertex_anchored" => Ok(FractionMethod::VertexAnchored),
            "parametric" => Ok(FractionMethod::Parametric),
            _ => Err(format!("Invalid fraction method: {input}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrackerParams {
    pub aggregation_scope: AggregationScope,
    pub fraction_method: FractionMethod,

    /// Increases of the distance to the destination up to this amount are not reported.
    pub monotonicity_tolerance: Meters,
    /// Fail the update instead of publishing a flagged state.
    pub strict_monotonicity: bool,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            aggregation_scope: AggregationScope::CurrentLeg,
            fraction_method: FractionMethod::VertexAnchored,
            monotonicity_tolerance: Meters::new(1e-6),
            strict_monotonicity: false,
        }
    }
}
