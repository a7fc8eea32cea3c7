use geo::{Coord, Distance, Euclidean, Haversine};

use crate::{
    error::{Result, TrackingError},
    geometry::point::{Point, SpatialReference},
};

/// Distance between two points, in meters for geographic references and in
/// map units otherwise.
pub fn distance(a: &Point, b: &Point) -> Result<f64> {
    ensure_compatible(&a.spatial_reference(), &b.spatial_reference())?;
    ensure_finite(a)?;
    ensure_finite(b)?;

    Ok(measure(a.spatial_reference(), a.coord(), b.coord()))
}

pub(crate) fn measure(spatial_reference: SpatialReference, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let a = geo::Point::from(a);
    let b = geo::Point::from(b);

    if spatial_reference.is_geographic() {
        Haversine.distance(a, b)
    } else {
        Euclidean.distance(a, b)
    }
}

/// Length of a path given as consecutive coordinates.
pub(crate) fn path_length(spatial_reference: SpatialReference, coords: &[Coord<f64>]) -> f64 {
    coords
        .windows(2)
        .map(|pair| measure(spatial_reference, pair[0], pair[1]))
        .sum()
}

pub(crate) fn ensure_compatible(a: &SpatialReference, b: &SpatialReference) -> Result<()> {
    if a.is_compatible_with(b) {
        Ok(())
    } else {
        Err(TrackingError::InvalidGeometry(format!(
            "spatial reference {} is incompatible with {}",
            a.wkid(),
            b.wkid()
        )))
    }
}

pub(crate) fn ensure_finite(point: &Point) -> Result<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(TrackingError::InvalidGeometry(format!(
            "point ({}, {}) has non-finite coordinates",
            point.x(),
            point.y()
        )))
    }
}
