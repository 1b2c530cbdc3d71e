//! Robot configuration.
//!
//! The configuration is a small JSON document read once at startup:
//!
//! ```json
//! {
//!     "modules": { "launcher": true, "portcullis": false },
//!     "routine": { "obstacle": "RockWall", "strategy": "DriveShootWithoutVision", "position": "4" }
//! }
//! ```
//!
//! Every field is optional. Missing modules are disabled and a missing
//! routine selection uses the [`RouteParameters`] defaults.

use std::{fs, path::Path};

use log::{info, warn};
use serde::Deserialize;

use crate::{auton::RouteParameters, error::ConfigError};

/// Which optional mechanisms are installed on the robot.
///
/// The routine builder leaves out steps for disabled modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub launcher:   bool,
    pub portcullis: bool,
}

impl FeatureFlags {
    pub fn new(launcher: bool, portcullis: bool) -> Self { Self { launcher, portcullis } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub modules: FeatureFlags,
    pub routine: RouteParameters,
}

impl RobotConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> { Ok(serde_json::from_str(json)?) }

    /// Reads and parses the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        info!("Loaded config from {}: {:?}", path.as_ref().display(), config);
        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to the defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|e| {
            warn!("Config Error ({}): {}, using defaults", path.as_ref().display(), e);
            Self::default()
        })
    }
}
