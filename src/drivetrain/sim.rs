//! An in-memory [`Drivetrain`] for host-side tests and bench runs.
//!
//! Positions can be set directly, and every command is recorded. Optionally,
//! each `drive_straight` call advances the encoders in proportion to the
//! commanded power, following the mirrored wiring of the real chassis.

use super::{Drivetrain, Side};
use crate::error::DeviceError;

/// A command received by a [`SimDrivetrain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    Straight(f64),
    Stop,
}

/// A simulated drivetrain.
///
/// # Example
///
/// ```ignore
/// // Four motors, each power unit moves the encoders 100 ticks per command.
/// let sim = SimDrivetrain::new(4).with_response(100.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimDrivetrain {
    positions:       Vec<f64>,
    /// Encoder ticks travelled per unit of power per command.
    ticks_per_power: f64,
    commands:        Vec<DriveCommand>,
    failing_reads:   Vec<usize>,
}

impl SimDrivetrain {
    /// A drivetrain with `motors` motors, all at zero, that does not move.
    pub fn new(motors: usize) -> Self {
        Self {
            positions:       vec![0.0; motors],
            ticks_per_power: 0.0,
            commands:        Vec::new(),
            failing_reads:   Vec::new(),
        }
    }

    /// Makes each `drive_straight(p)` advance the encoders by
    /// `p * ticks_per_power` ticks (left side negated).
    pub fn with_response(mut self, ticks_per_power: f64) -> Self {
        self.ticks_per_power = ticks_per_power;
        self
    }

    /// Starts the encoders at the given positions.
    pub fn with_positions(mut self, positions: &[f64]) -> Self {
        self.positions = positions.to_vec();
        self
    }

    pub fn set_position(&mut self, index: usize, ticks: f64) {
        if let Some(p) = self.positions.get_mut(index) {
            *p = ticks;
        }
    }

    /// Makes reads of motor `index` fail from now on.
    pub fn fail_reads(&mut self, index: usize) { self.failing_reads.push(index); }

    pub fn positions(&self) -> &[f64] { &self.positions }

    pub fn last_command(&self) -> Option<DriveCommand> { self.commands.last().copied() }

    pub fn stop_count(&self) -> usize {
        self.commands.iter().filter(|c| **c == DriveCommand::Stop).count()
    }
}

impl Drivetrain for SimDrivetrain {
    fn motor_count(&self) -> usize { self.positions.len() }

    fn motor_position(&self, index: usize) -> Result<f64, DeviceError> {
        if self.failing_reads.contains(&index) {
            return Err(DeviceError::Device(format!("motor {} disconnected", index)));
        }
        self.positions
            .get(index)
            .copied()
            .ok_or(DeviceError::MotorIndex {
                index,
                count: self.positions.len(),
            })
    }

    fn drive_straight(&mut self, power: f64) -> Result<(), DeviceError> {
        self.commands.push(DriveCommand::Straight(power));
        let count = self.positions.len();
        let step = power * self.ticks_per_power;
        for (i, position) in self.positions.iter_mut().enumerate() {
            match Side::of(i, count) {
                Side::Left => *position -= step,
                Side::Right => *position += step,
            }
        }
        Ok(())
    }

    fn stop_all_motors(&mut self) -> Result<(), DeviceError> {
        self.commands.push(DriveCommand::Stop);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_power_advances_left_side() {
        let mut sim = SimDrivetrain::new(4).with_response(10.0);
        sim.drive_straight(-0.5).unwrap();
        assert_eq!(sim.positions(), &[5.0, 5.0, -5.0, -5.0]);
        assert_eq!(sim.last_command(), Some(DriveCommand::Straight(-0.5)));
    }

    #[test]
    fn reads_report_errors() {
        let mut sim = SimDrivetrain::new(4);
        sim.fail_reads(2);
        assert!(matches!(sim.motor_position(2), Err(DeviceError::Device(_))));
        assert!(matches!(
            sim.motor_position(7),
            Err(DeviceError::MotorIndex { index: 7, count: 4 })
        ));
    }
}
