//! The drivetrain boundary.
//!
//! Tasks never talk to motor controllers directly. They receive a
//! [`SharedDrivetrain`] handle at construction and go through the
//! [`Drivetrain`] trait, which exposes exactly what autonomous motion needs:
//! per-motor encoder positions, a straight-drive power command and a
//! failsafe stop.
//!
//! # Motor Layout
//!
//! Motors are indexed with the left side first. In the standard four-motor
//! chassis, indices `0` and `1` are the left motors and `2` and `3` the right
//! motors. The two sides are wired as mirror images, so for the same chassis
//! motion the left encoders count up while the right encoders count down.
//!
//! # Implementations
//!
//! - [`sim::SimDrivetrain`]: An in-memory drivetrain for host-side testing.
//! - `vex::VexDrivetrain`: V5 smart motors (requires the `vexide` feature).

use std::{cell::RefCell, rc::Rc};

use crate::error::DeviceError;

/// In-memory drivetrain used for testing and bench runs.
pub mod sim;

/// V5 smart motor adapter.
#[cfg(feature = "vexide")]
pub mod vex;

/// A chassis with per-motor encoders.
pub trait Drivetrain {
    /// Number of drive motors, left side first.
    fn motor_count(&self) -> usize;

    /// The encoder position of motor `index`, in encoder ticks.
    fn motor_position(&self, index: usize) -> Result<f64, DeviceError>;

    /// Drives every motor with the same power in `[-1.0, 1.0]`.
    ///
    /// With the mirrored wiring, a negative power advances the left encoders
    /// and retracts the right encoders.
    fn drive_straight(&mut self, power: f64) -> Result<(), DeviceError>;

    /// Cuts output to every motor.
    fn stop_all_motors(&mut self) -> Result<(), DeviceError>;
}

/// A drivetrain handle shared between the tasks that use it.
pub type SharedDrivetrain = Rc<RefCell<dyn Drivetrain>>;

/// Which side of the chassis a motor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    /// The mirrored side; its encoders count down when driving forward.
    Right,
}

impl Side {
    /// The side of motor `index` in a drivetrain with `count` motors.
    ///
    /// The first half of the indices is the left side.
    pub fn of(index: usize, count: usize) -> Side {
        if index >= count / 2 { Side::Right } else { Side::Left }
    }

    /// True for the side with inverted wiring.
    pub fn is_inverted(self) -> bool { self == Side::Right }
}
