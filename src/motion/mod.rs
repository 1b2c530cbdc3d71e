//! Closed-loop chassis motion.
//!
//! This module converts linear distances into encoder targets and drives the
//! chassis until the encoders report arrival.
//!
//! # Drivetrain Constants
//!
//! The constants below describe the competition chassis and are fixed:
//! a 256-count encoder read in quadrature (×4) on a 14 inch effective wheel
//! diameter. One inch of travel is therefore `1024 / (14π) ≈ 23.28` ticks.
//!
//! # Example
//!
//! ```ignore
//! use stronghold::motion::position::PositionDriveController;
//!
//! let drive = PositionDriveController::new(drivetrain.clone(), 30.0);
//! scheduler.schedule(Box::new(drive));
//! ```

/// Position-mode straight driving.
pub mod position;

use std::f64::consts::PI;

/// Encoder counts per wheel revolution.
pub const TICKS_PER_REVOLUTION: f64 = 256.0;

/// Quadrature decoding multiplier applied to the encoder counts.
pub const ENCODER_MULTIPLIER: f64 = 4.0;

/// Effective wheel diameter in inches.
pub const WHEEL_DIAMETER: f64 = 14.0;

/// Power magnitude used while driving to a position target.
pub const DRIVE_STRAIGHT_POWER: f64 = 0.7;

/// Encoder ticks for a linear distance in inches.
///
/// `ticks = inches * 256 * 4 / (14π)`. The sign of `inches` is kept.
pub fn inches_to_ticks(inches: f64) -> f64 {
    inches * TICKS_PER_REVOLUTION * ENCODER_MULTIPLIER / (WHEEL_DIAMETER * PI)
}
