use jiff::SignedDuration;

use crate::{
    define_index_newtype,
    error::{Result, TrackingError},
    geometry::{distance::measure, point::SpatialReference, polyline::Polyline},
    meters::Meters,
    route::segment::{Segment, SegmentIdx},
};

define_index_newtype!(LegIdx, Leg);

/// Segments are within this distance of each other to be considered contiguous.
pub const DEFAULT_CONTIGUITY_TOLERANCE: f64 = 0.01;

/// Travel between two stops, as an ordered run of contiguous segments.
#[derive(Debug, Clone)]
pub struct Leg {
    segments: Vec<Segment>,
    /// All segments joined into a single part, for drawing the route line.
    geometry: Polyline,
}

impl Leg {
    pub fn new(segments: Vec<Segment>, contiguity_tolerance: f64) -> Result<Self> {
        let Some(first) = segments.first() else {
            return Err(TrackingError::MalformedRoute("leg has no segments".to_string()));
        };

        let spatial_reference = first.geometry().spatial_reference();
        for (index, segment) in segments.iter().enumerate() {
            let segment_reference = segment.geometry().spatial_reference();
            if !segment_reference.is_compatible_with(&spatial_reference) {
                return Err(TrackingError::MalformedRoute(format!(
                    "segment {} uses spatial reference {} while the leg uses {}",
                    index,
                    segment_reference.wkid(),
                    spatial_reference.wkid()
                )));
            }
        }

        Self::ensure_contiguous(&segments, spatial_reference, contiguity_tolerance)?;

        let total_duration = segments.iter().try_fold(SignedDuration::ZERO, |total, segment| {
            total.checked_add(segment.duration())
        });
        if total_duration.is_none() {
            return Err(TrackingError::MalformedRoute(
                "total duration of the leg is out of range".to_string(),
            ));
        }

        let parts = segments
            .iter()
            .flat_map(|segment| segment.geometry().parts().iter().cloned())
            .collect();
        let geometry = Polyline::new(parts, spatial_reference)?.merged();

        Ok(Leg { segments, geometry })
    }

    fn ensure_contiguous(
        segments: &[Segment],
        spatial_reference: SpatialReference,
        tolerance: f64,
    ) -> Result<()> {
        for (index, pair) in segments.windows(2).enumerate() {
            let end = pair[0].geometry().last_point();
            let start = pair[1].geometry().first_point();
            let gap = measure(spatial_reference, end.coord(), start.coord());

            if gap > tolerance {
                return Err(TrackingError::MalformedRoute(format!(
                    "segment {} ends {} away from the start of segment {}",
                    index,
                    gap,
                    index + 1
                )));
            }
        }

        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, segment_index: SegmentIdx) -> Option<&Segment> {
        self.segments.get(segment_index.get())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_segment_index(&self) -> SegmentIdx {
        SegmentIdx::new(self.segments.len() - 1)
    }

    pub fn geometry(&self) -> &Polyline {
        &self.geometry
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.geometry.spatial_reference()
    }

    pub fn length(&self) -> Meters {
        self.segments.iter().map(Segment::length).sum()
    }

    pub fn duration(&self) -> SignedDuration {
        self.segments
            .iter()
            .fold(SignedDuration::ZERO, |acc, segment| acc + segment.duration())
    }
}
