//! Autonomous routine selection and composition.
//!
//! Before the match starts, the drive team picks three values: the
//! [`ObstacleType`] the robot will cross, the [`Strategy`] to run, and the
//! [`StartPosition`] on the field. Together they form the
//! [`RouteParameters`], which the [`routine`] builder turns into a
//! [`TaskGroup`](crate::command::TaskGroup) using the [`catalog`] tables.
//!
//! Every selection enum has an `Unknown` variant. Values that cannot be
//! parsed resolve to it, and the catalog returns a safe default for it
//! instead of failing.

/// Per-obstacle and per-position lookup tables.
pub mod catalog;

/// The routine builder.
pub mod routine;

use std::{fmt, str::FromStr};

use log::warn;
use serde::Deserialize;

/// The field obstacle crossed at the start of autonomous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum ObstacleType {
    #[default]
    LowBar,
    Moat,
    RoughTerrain,
    RockWall,
    Portcullis,
    Unknown,
}

/// What the robot does after leaving its start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum Strategy {
    /// Stay put.
    #[default]
    None,
    /// Drive across the obstacle and stop.
    DriveAcross,
    /// Cross, turn toward the goal and shoot using vision targeting.
    DriveShootWithVision,
    /// Cross, turn toward the goal and shoot at a fixed launcher angle.
    DriveShootWithoutVision,
    Unknown,
}

/// The starting slot along the field wall, numbered from the low bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum StartPosition {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
    Unknown,
}

/// The routine selection, fixed once before the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RouteParameters {
    pub obstacle: ObstacleType,
    pub strategy: Strategy,
    pub position: StartPosition,
}

impl RouteParameters {
    pub fn new(obstacle: ObstacleType, strategy: Strategy, position: StartPosition) -> Self {
        Self {
            obstacle,
            strategy,
            position,
        }
    }
}

impl fmt::Display for RouteParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}/{:?}", self.obstacle, self.strategy, self.position)
    }
}

/// Lowercases and strips separators so `"ROUGH_TERRAIN"`, `"rough-terrain"`
/// and `"RoughTerrain"` all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn unrecognized<T: fmt::Debug>(kind: &str, input: &str, fallback: T) -> T {
    warn!("Unrecognized {} '{}', using {:?}", kind, input, fallback);
    fallback
}

impl FromStr for ObstacleType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "lowbar" => ObstacleType::LowBar,
            "moat" => ObstacleType::Moat,
            "roughterrain" => ObstacleType::RoughTerrain,
            "rockwall" => ObstacleType::RockWall,
            "portcullis" => ObstacleType::Portcullis,
            _ => unrecognized("obstacle", s, ObstacleType::Unknown),
        })
    }
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "none" => Strategy::None,
            "driveacross" => Strategy::DriveAcross,
            "driveshootwithvision" | "driveshootvision" => Strategy::DriveShootWithVision,
            "driveshootwithoutvision" | "driveshootnovision" => Strategy::DriveShootWithoutVision,
            _ => unrecognized("strategy", s, Strategy::Unknown),
        })
    }
}

impl FromStr for StartPosition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "one" | "1" => StartPosition::One,
            "two" | "2" => StartPosition::Two,
            "three" | "3" => StartPosition::Three,
            "four" | "4" => StartPosition::Four,
            "five" | "5" => StartPosition::Five,
            _ => unrecognized("start position", s, StartPosition::Unknown),
        })
    }
}

macro_rules! from_string {
    ($($ty:ty),*) => {$(
        impl From<String> for $ty {
            fn from(s: String) -> Self {
                match s.parse() {
                    Ok(v) => v,
                    Err(never) => match never {},
                }
            }
        }
    )*};
}

from_string!(ObstacleType, Strategy, StartPosition);
