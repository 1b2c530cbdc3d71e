//! Compiled-in routine parameters.
//!
//! Distances are in inches and angles in degrees. Speeds and angles are
//! signed: a negative speed drives in reverse, a negative turn angle turns
//! left. `Unknown` selections resolve to the defaults listed per function.

use super::{ObstacleType, StartPosition};

/// Whether the portcullis lifter should start down. Only the low bar needs
/// it lowered.
pub fn begin_portcullis_down(obstacle: ObstacleType) -> bool {
    matches!(obstacle, ObstacleType::LowBar)
}

/// Whether the launcher should start in its travel position. Only the low
/// bar needs it stowed.
pub fn begin_launcher_travel_position(obstacle: ObstacleType) -> bool {
    matches!(obstacle, ObstacleType::LowBar)
}

/// Distance needed to cross the obstacle. Defaults to 145.
pub fn base_distance_inches(obstacle: ObstacleType) -> i32 {
    match obstacle {
        ObstacleType::LowBar => 130,
        ObstacleType::Moat => 145,
        ObstacleType::RoughTerrain => 180,
        ObstacleType::RockWall => 150,
        ObstacleType::Portcullis => 120,
        ObstacleType::Unknown => 145,
    }
}

/// Crossing speed. The rock wall is taken in reverse. Defaults to 35.
pub fn base_speed(obstacle: ObstacleType) -> i32 {
    match obstacle {
        ObstacleType::LowBar => 30,
        ObstacleType::Moat => 50,
        ObstacleType::RoughTerrain => 40,
        ObstacleType::RockWall => -75,
        ObstacleType::Portcullis => 30,
        ObstacleType::Unknown => 35,
    }
}

/// Turn toward the goal after crossing. Defaults to 0.
pub fn turn_angle_degrees(position: StartPosition) -> f64 {
    match position {
        StartPosition::One => 80.4,
        StartPosition::Two => 41.08,
        StartPosition::Three => 11.95,
        StartPosition::Four => -13.12,
        StartPosition::Five => -57.75,
        StartPosition::Unknown => 0.0,
    }
}

/// Launcher elevation for a fixed-angle shot. Defaults to 40.
pub fn aim_angle_degrees(position: StartPosition) -> f64 {
    match position {
        StartPosition::Three => 30.0,
        StartPosition::One | StartPosition::Two | StartPosition::Four | StartPosition::Five => 40.0,
        StartPosition::Unknown => 40.0,
    }
}

/// Extra distance to drive past the obstacle to reach the shooting spot.
/// Defaults to 70.
pub fn distance_past_defense(position: StartPosition) -> f64 {
    match position {
        StartPosition::One => 38.0,
        StartPosition::Two => 101.05,
        StartPosition::Three => 74.1,
        StartPosition::Four => 75.09,
        StartPosition::Five => 104.97,
        StartPosition::Unknown => 70.0,
    }
}
