use geo::{Coord, Line, LineString};

use crate::{
    error::{Result, TrackingError},
    geometry::{
        distance::{ensure_compatible, path_length},
        point::{Point, SpatialReference},
    },
};

/// One or more parts, each an ordered run of at least two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    parts: Vec<LineString<f64>>,
    spatial_reference: SpatialReference,
}

impl Polyline {
    pub fn new(parts: Vec<LineString<f64>>, spatial_reference: SpatialReference) -> Result<Self> {
        if parts.is_empty() {
            return Err(TrackingError::InvalidGeometry("polyline has no parts".to_string()));
        }

        for (index, part) in parts.iter().enumerate() {
            if part.0.len() < 2 {
                return Err(TrackingError::InvalidGeometry(format!(
                    "polyline part {} has {} points, at least 2 are required",
                    index,
                    part.0.len()
                )));
            }

            if part.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(TrackingError::InvalidGeometry(format!(
                    "polyline part {index} has non-finite coordinates"
                )));
            }
        }

        Ok(Polyline {
            parts,
            spatial_reference,
        })
    }

    pub fn from_coords(
        parts: Vec<Vec<[f64; 2]>>,
        spatial_reference: SpatialReference,
    ) -> Result<Self> {
        Polyline::new(
            parts.into_iter().map(LineString::from).collect(),
            spatial_reference,
        )
    }

    /// Single part polyline through the given points, which must share a spatial reference.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        let Some(first) = points.first() else {
            return Err(TrackingError::InvalidGeometry("polyline has no points".to_string()));
        };

        let spatial_reference = first.spatial_reference();
        for point in points {
            ensure_compatible(&spatial_reference, &point.spatial_reference())?;
        }

        Polyline::new(
            vec![points.iter().map(|point| point.coord()).collect()],
            spatial_reference,
        )
    }

    pub fn parts(&self) -> &[LineString<f64>] {
        &self.parts
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn vertex_count(&self, part_index: usize) -> Option<usize> {
        self.parts.get(part_index).map(|part| part.0.len())
    }

    pub fn vertex(&self, part_index: usize, vertex_index: usize) -> Option<Point> {
        self.parts
            .get(part_index)?
            .0
            .get(vertex_index)
            .map(|&coord| Point::from_coord(coord, self.spatial_reference))
    }

    pub fn first_point(&self) -> Point {
        Point::from_coord(self.parts[0].0[0], self.spatial_reference)
    }

    pub fn last_point(&self) -> Point {
        let last_part = &self.parts[self.parts.len() - 1];
        Point::from_coord(last_part.0[last_part.0.len() - 1], self.spatial_reference)
    }

    /// Total length over all parts. The gaps between parts are not counted.
    pub fn length(&self) -> f64 {
        self.parts
            .iter()
            .map(|part| path_length(self.spatial_reference, &part.0))
            .sum()
    }

    /// Joins all parts into a single one, dropping the first vertex of every
    /// part after the first since it repeats the end of the previous part.
    pub fn merged(&self) -> Polyline {
        let mut coords = self.parts[0].0.clone();
        for part in &self.parts[1..] {
            coords.extend(part.0.iter().skip(1).copied());
        }

        Polyline {
            parts: vec![LineString::new(coords)],
            spatial_reference: self.spatial_reference,
        }
    }

    /// Every sub-edge as `(part_index, start_vertex_index, line)`.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (usize, usize, Line<f64>)> + '_ {
        self.parts.iter().enumerate().flat_map(|(part_index, part)| {
            part.lines()
                .enumerate()
                .map(move |(vertex_index, line)| (part_index, vertex_index, line))
        })
    }

    pub(crate) fn vertices(&self) -> impl Iterator<Item = (usize, usize, Coord<f64>)> + '_ {
        self.parts.iter().enumerate().flat_map(|(part_index, part)| {
            part.coords()
                .enumerate()
                .map(move |(vertex_index, &coord)| (part_index, vertex_index, coord))
        })
    }
}
