use geo::Coord;

use crate::{
    error::Result,
    geometry::{
        distance::{measure, path_length},
        point::Point,
        polyline::Polyline,
        proximity::{Proximity, nearest_vertex},
    },
    params::FractionMethod,
};

/// Share of the segment still ahead of the snapped point, from 0 to 1.
///
/// The segment is cut at the snapped point on its current sub-edge and the
/// ratio of the length ahead over the whole length is returned. A segment
/// without any length counts as not started.
pub fn fraction_remaining(
    geometry: &Polyline,
    proximity: &Proximity,
    method: FractionMethod,
) -> Result<f64> {
    let merged = geometry.merged();
    let spatial_reference = merged.spatial_reference();
    let coords = &merged.parts()[0].0;
    let location = proximity.point.coord();

    let edge_index = match method {
        FractionMethod::VertexAnchored => anchored_edge_index(&merged, coords, &proximity.point)?,
        FractionMethod::Parametric => {
            merged_edge_index(geometry, proximity.part_index, proximity.vertex_index)
        }
    };

    let distance_behind = path_length(spatial_reference, &coords[..=edge_index])
        + measure(spatial_reference, coords[edge_index], location);
    let distance_ahead = measure(spatial_reference, location, coords[edge_index + 1])
        + path_length(spatial_reference, &coords[edge_index + 1..]);

    let total = distance_behind + distance_ahead;
    if total == 0.0 {
        return Ok(1.0);
    }

    Ok((distance_ahead / total).clamp(0.0, 1.0))
}

/// Guesses the sub-edge the point is on from its nearest vertex: the first and
/// last vertices only touch one sub-edge, for the others the point is assumed to
/// be before the vertex when it is farther from the next vertex than the vertex itself.
fn anchored_edge_index(merged: &Polyline, coords: &[Coord<f64>], point: &Point) -> Result<usize> {
    let spatial_reference = merged.spatial_reference();
    let vertex_index = nearest_vertex(merged, point)?.vertex_index;
    let last_index = coords.len() - 1;

    let edge_index = if vertex_index == 0 {
        0
    } else if vertex_index == last_index {
        last_index - 1
    } else {
        let successor = coords[vertex_index + 1];
        let vertex_to_successor = measure(spatial_reference, coords[vertex_index], successor);
        let point_to_successor = measure(spatial_reference, point.coord(), successor);

        if vertex_to_successor < point_to_successor {
            vertex_index - 1
        } else {
            vertex_index
        }
    };

    Ok(edge_index)
}

/// Position of a `(part, vertex)` sub-edge once all parts are merged.
fn merged_edge_index(geometry: &Polyline, part_index: usize, vertex_index: usize) -> usize {
    let preceding_edges: usize = geometry.parts()[..part_index]
        .iter()
        .map(|part| part.0.len() - 1)
        .sum();

    preceding_edges + vertex_index
}
