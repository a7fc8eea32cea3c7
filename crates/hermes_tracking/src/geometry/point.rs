use geo::Coord;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Well-known id of the coordinate system a geometry is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SpatialReference {
    wkid: u32,
}

impl SpatialReference {
    pub const WGS84: SpatialReference = SpatialReference { wkid: 4326 };
    pub const WEB_MERCATOR: SpatialReference = SpatialReference { wkid: 3857 };

    pub const fn new(wkid: u32) -> Self {
        SpatialReference { wkid }
    }

    pub fn wkid(&self) -> u32 {
        self.wkid
    }

    /// Geographic references are measured with haversine, everything else is planar.
    pub fn is_geographic(&self) -> bool {
        self.wkid == Self::WGS84.wkid
    }

    pub fn is_compatible_with(&self, other: &SpatialReference) -> bool {
        self.canonical_wkid() == other.canonical_wkid()
    }

    // Web Mercator has been published under several ids over the years.
    fn canonical_wkid(&self) -> u32 {
        match self.wkid {
            102100 | 102113 | 900913 => Self::WEB_MERCATOR.wkid,
            wkid => wkid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z: Option<f64>,
    spatial_reference: SpatialReference,
}

impl Point {
    pub fn new(x: f64, y: f64, spatial_reference: SpatialReference) -> Self {
        Point {
            x,
            y,
            z: None,
            spatial_reference,
        }
    }

    pub fn with_z(x: f64, y: f64, z: f64, spatial_reference: SpatialReference) -> Self {
        Point {
            x,
            y,
            z: Some(z),
            spatial_reference,
        }
    }

    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Point::new(lon, lat, SpatialReference::WGS84)
    }

    pub(crate) fn from_coord(coord: Coord<f64>, spatial_reference: SpatialReference) -> Self {
        Point::new(coord.x, coord.y, spatial_reference)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> Option<f64> {
        self.z
    }

    pub fn lon(&self) -> f64 {
        self.x
    }

    pub fn lat(&self) -> f64 {
        self.y
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_none_or(f64::is_finite)
    }

    pub(crate) fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

impl From<&Point> for geo::Point<f64> {
    fn from(point: &Point) -> Self {
        geo::Point::new(point.x, point.y)
    }
}

impl From<&Point> for Coord<f64> {
    fn from(point: &Point) -> Self {
        point.coord()
    }
}
