use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque maneuver code as emitted by the route source, e.g. `esriDMTTurnRight`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManeuverType(String);

impl ManeuverType {
    pub fn new(code: impl Into<String>) -> Self {
        ManeuverType(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Substitutes the code into an icon path template such as
    /// `"Assets/Maneuvers/{}.png"`.
    pub fn icon_path(&self, template: &str) -> String {
        template.replace("{}", &self.0)
    }
}

impl fmt::Display for ManeuverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
