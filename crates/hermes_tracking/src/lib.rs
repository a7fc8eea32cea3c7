pub mod error;
pub mod geometry;
pub mod json;
pub mod meters;
pub mod params;
pub mod progress;
pub mod route;
pub mod snap;
pub mod tracker;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
