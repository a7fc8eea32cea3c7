pub mod distance;
pub mod point;
pub mod polyline;
pub mod proximity;
