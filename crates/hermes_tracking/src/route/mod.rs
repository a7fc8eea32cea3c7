pub mod leg;
pub mod maneuver;
#[allow(clippy::module_inception)]
pub mod route;
pub mod segment;
