//! V5 smart motor drivetrain.
//!
//! Wraps left and right motor groups and implements [`Drivetrain`] on top of
//! the motors' integrated encoders.
//!
//! # Example
//!
//! ```ignore
//! use stronghold::drivetrain::vex::VexDrivetrain;
//! use vexide::prelude::*;
//!
//! let drivetrain = VexDrivetrain::new(
//!     [
//!         Motor::new(peripherals.port_1, Gearset::Green, Direction::Forward),
//!         Motor::new(peripherals.port_2, Gearset::Green, Direction::Forward),
//!     ],
//!     [
//!         Motor::new(peripherals.port_3, Gearset::Green, Direction::Forward),
//!         Motor::new(peripherals.port_4, Gearset::Green, Direction::Forward),
//!     ],
//! );
//! ```

use std::{cell::RefCell, f64::consts::TAU, rc::Rc};

use log::warn;
use vexide::smart::motor::{BrakeMode, Motor};

use super::Drivetrain;
use crate::{
    error::DeviceError,
    motion::{ENCODER_MULTIPLIER, TICKS_PER_REVOLUTION},
};

/// Full-scale motor voltage.
const MAX_VOLTAGE: f64 = 12.0;

/// A drivetrain of V5 smart motors.
///
/// All motors should be created with `Direction::Forward`. The mirrored
/// wiring of the chassis is applied here: the left side is driven against
/// the commanded sign, and raw encoder readings are reported unchanged.
#[derive(Clone)]
pub struct VexDrivetrain {
    /// The left motor group (indices `0..left.len()`).
    pub left:  Rc<RefCell<dyn AsMut<[Motor]>>>,
    /// The right motor group (indices following the left group).
    pub right: Rc<RefCell<dyn AsMut<[Motor]>>>,
}

impl VexDrivetrain {
    /// Creates a drivetrain from owned left/right motor groups.
    pub fn new<L: AsMut<[Motor]> + 'static, R: AsMut<[Motor]> + 'static>(left: L, right: R) -> Self {
        Self {
            left:  Rc::new(RefCell::new(left)),
            right: Rc::new(RefCell::new(right)),
        }
    }

    fn left_len(&self) -> Result<usize, DeviceError> {
        let mut motors = self.left.try_borrow_mut().map_err(|_| DeviceError::Busy)?;
        Ok(motors.as_mut().len())
    }

    fn set_voltages(&self, left_voltage: f64, right_voltage: f64) -> Result<(), DeviceError> {
        let mut failure = None;
        for (group, voltage) in [(&self.left, left_voltage), (&self.right, right_voltage)] {
            let mut motors = group.try_borrow_mut().map_err(|_| DeviceError::Busy)?;
            for motor in motors.as_mut() {
                if let Err(e) = motor.set_voltage(voltage) {
                    warn!("Motor Voltage Error: {}", e);
                    failure = Some(DeviceError::Device(e.to_string()));
                }
            }
        }
        failure.map_or(Ok(()), Err)
    }
}

impl Drivetrain for VexDrivetrain {
    fn motor_count(&self) -> usize {
        let left = self.left.try_borrow_mut().map(|mut m| m.as_mut().len());
        let right = self.right.try_borrow_mut().map(|mut m| m.as_mut().len());
        match (left, right) {
            (Ok(l), Ok(r)) => l + r,
            _ => {
                warn!("Error Borrowing Motor Group");
                0
            }
        }
    }

    fn motor_position(&self, index: usize) -> Result<f64, DeviceError> {
        let left_len = self.left_len()?;
        let (group, local) = if index < left_len {
            (&self.left, index)
        } else {
            (&self.right, index - left_len)
        };
        let mut motors = group.try_borrow_mut().map_err(|_| DeviceError::Busy)?;
        let motors = motors.as_mut();
        let count = motors.len();
        let motor = motors.get(local).ok_or(DeviceError::MotorIndex {
            index,
            count: left_len + count,
        })?;
        let angle = motor.position().map_err(|e| DeviceError::Device(e.to_string()))?;
        Ok(angle.as_radians() / TAU * TICKS_PER_REVOLUTION * ENCODER_MULTIPLIER)
    }

    fn drive_straight(&mut self, power: f64) -> Result<(), DeviceError> {
        let voltage = power.clamp(-1.0, 1.0) * MAX_VOLTAGE;
        self.set_voltages(-voltage, voltage)
    }

    fn stop_all_motors(&mut self) -> Result<(), DeviceError> {
        let mut failure = None;
        for group in [&self.left, &self.right] {
            // Keep going on a busy group so the other side still stops.
            let Ok(mut motors) = group.try_borrow_mut() else {
                failure = Some(DeviceError::Busy);
                continue;
            };
            for motor in motors.as_mut() {
                if let Err(e) = motor.brake(BrakeMode::Brake) {
                    warn!("Motor Brake Error: {}", e);
                    failure = Some(DeviceError::Device(e.to_string()));
                }
            }
        }
        failure.map_or(Ok(()), Err)
    }
}
