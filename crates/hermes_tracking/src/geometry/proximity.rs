use geo::{Closest, ClosestPoint, Coord, Line};

use crate::{
    error::{Result, TrackingError},
    geometry::{
        distance::{ensure_compatible, ensure_finite, measure},
        point::{Point, SpatialReference},
        polyline::Polyline,
    },
};

/// Closest point lying anywhere on a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub point: Point,
    pub part_index: usize,
    /// Vertex immediately preceding the projected point within its part.
    pub vertex_index: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexProximity {
    pub part_index: usize,
    pub vertex_index: usize,
    pub distance: f64,
}

/// Projects `location` on every sub-edge of `line` and keeps the closest one.
/// Ties resolve to the lower vertex index.
pub fn nearest_point_on_polyline(line: &Polyline, location: &Point) -> Result<Proximity> {
    let spatial_reference = line.spatial_reference();
    ensure_compatible(&spatial_reference, &location.spatial_reference())?;
    ensure_finite(location)?;

    let target = location.coord();
    let mut best: Option<Proximity> = None;

    for (part_index, vertex_index, edge) in line.edges() {
        let projected = project_onto_edge(spatial_reference, edge, target);
        let distance = measure(spatial_reference, target, projected);

        if best.is_none_or(|best| distance < best.distance) {
            best = Some(Proximity {
                point: Point::from_coord(projected, spatial_reference),
                part_index,
                vertex_index,
                distance,
            });
        }
    }

    best.ok_or_else(|| TrackingError::InvalidGeometry("polyline has no edges".to_string()))
}

/// Closest vertex of `line`. Ties resolve to the lower vertex index.
pub fn nearest_vertex(line: &Polyline, location: &Point) -> Result<VertexProximity> {
    let spatial_reference = line.spatial_reference();
    ensure_compatible(&spatial_reference, &location.spatial_reference())?;
    ensure_finite(location)?;

    let target = location.coord();
    let mut best: Option<VertexProximity> = None;

    for (part_index, vertex_index, vertex) in line.vertices() {
        let distance = measure(spatial_reference, target, vertex);
        if best.is_none_or(|best| distance < best.distance) {
            best = Some(VertexProximity {
                part_index,
                vertex_index,
                distance,
            });
        }
    }

    best.ok_or_else(|| TrackingError::InvalidGeometry("polyline has no vertices".to_string()))
}

fn project_onto_edge(
    spatial_reference: SpatialReference,
    edge: Line<f64>,
    target: Coord<f64>,
) -> Coord<f64> {
    if !spatial_reference.is_geographic() {
        return closest_on_line(edge, target);
    }

    // Equirectangular frame centered on the target, good enough at the scale of a route edge.
    let scale = target.y.to_radians().cos().max(1e-12);
    let to_local = |coord: Coord<f64>| Coord {
        x: (coord.x - target.x) * scale,
        y: coord.y - target.y,
    };

    let local_edge = Line::new(to_local(edge.start), to_local(edge.end));
    let local = closest_on_line(local_edge, Coord { x: 0.0, y: 0.0 });

    Coord {
        x: local.x / scale + target.x,
        y: local.y + target.y,
    }
}

fn closest_on_line(edge: Line<f64>, target: Coord<f64>) -> Coord<f64> {
    match edge.closest_point(&geo::Point::from(target)) {
        Closest::Intersection(point) | Closest::SinglePoint(point) => point.0,
        // Zero length edge
        Closest::Indeterminate => edge.start,
    }
}
