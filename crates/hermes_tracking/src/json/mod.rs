use std::io::Read;

use tracing::instrument;

use crate::{error::Result, route::leg::DEFAULT_CONTIGUITY_TOLERANCE, route::route::Route};

pub mod schema;
pub mod types;

impl Route {
    /// Parses a route document, see [`types::JsonRoute`].
    #[instrument(skip_all, level = "debug")]
    pub fn from_json(json: &str) -> Result<Route> {
        let document: types::JsonRoute = serde_json::from_str(json)?;
        document.build_route(DEFAULT_CONTIGUITY_TOLERANCE)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Route> {
        let document: types::JsonRoute = serde_json::from_reader(reader)?;
        document.build_route(DEFAULT_CONTIGUITY_TOLERANCE)
    }
}
