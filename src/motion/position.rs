//! Position-mode straight driving.
//!
//! [`PositionDriveController`] is a [`Task`] that drives the chassis a fixed
//! linear distance using the drive motors' encoders:
//!
//! 1. On `initialize`, every motor's current encoder reading is captured and
//!    a target is computed from it. Left motors count up toward their target,
//!    right (mirrored) motors count down.
//! 2. On every `execute`, the whole chassis is driven at a fixed power.
//! 3. `is_finished` checks one front motor per side, chosen by the sign of
//!    the requested distance.
//! 4. `end` and `interrupted` always stop the drivetrain, unless the shared
//!    handle is still borrowed elsewhere, which is logged as an error.
//!
//! # Power Convention
//!
//! The commanded power has the opposite sign of the requested distance: a
//! positive (or zero) distance drives at `-0.7`, a negative distance at
//! `+0.7`. This matches the chassis wiring the targets are computed for and
//! must not be "corrected" on its own.

use heapless::Vec;
use log::{debug, error, info, trace, warn};

use super::{DRIVE_STRAIGHT_POWER, inches_to_ticks};
use crate::{
    command::{Subsystem, SubsystemSet, Task},
    drivetrain::{SharedDrivetrain, Side},
};

/// Most drive motors a controller will track.
pub const MAX_DRIVE_MOTORS: usize = 8;

/// Motors checked for arrival when driving a positive distance.
const FORWARD_CHECK_MOTORS: [usize; 2] = [1, 3];

/// Motors checked for arrival when driving a zero or negative distance.
const REVERSE_CHECK_MOTORS: [usize; 2] = [0, 2];

/// The encoder goal of one drive motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorTarget {
    pub index:        usize,
    /// Encoder reading captured at initialization.
    pub start_ticks:  f64,
    pub target_ticks: f64,
    /// True for the mirrored (right) side.
    pub inverted:     bool,
}

impl MotorTarget {
    /// Builds the target for motor `index` of `count`, `ticks` away from
    /// `start_ticks`.
    pub fn new(index: usize, count: usize, start_ticks: f64, ticks: f64) -> Self {
        let inverted = Side::of(index, count).is_inverted();
        let target_ticks = if inverted { start_ticks - ticks } else { start_ticks + ticks };
        Self {
            index,
            start_ticks,
            target_ticks,
            inverted,
        }
    }

    /// Whether `current_ticks` has reached the target for a move of
    /// `distance` inches.
    ///
    /// | side     | distance < 0       | distance >= 0      |
    /// |----------|--------------------|--------------------|
    /// | left     | current <= target  | current >= target  |
    /// | right    | current >= target  | current <= target  |
    pub fn reached(&self, current_ticks: f64, distance: f64) -> bool {
        match (self.inverted, distance < 0.0) {
            (true, true) => current_ticks >= self.target_ticks,
            (true, false) => current_ticks <= self.target_ticks,
            (false, true) => current_ticks <= self.target_ticks,
            (false, false) => current_ticks >= self.target_ticks,
        }
    }
}

/// Drives the chassis a linear distance in inches using encoder feedback.
pub struct PositionDriveController {
    name:       String,
    drivetrain: SharedDrivetrain,
    distance:   f64,
    targets:    Vec<MotorTarget, MAX_DRIVE_MOTORS>,
}

impl PositionDriveController {
    /// Creates a controller that will drive `distance` inches on
    /// `drivetrain`. Nothing moves until the scheduler activates it.
    pub fn new(drivetrain: SharedDrivetrain, distance: f64) -> Self {
        Self {
            name: format!("position drive {}in", distance),
            drivetrain,
            distance,
            targets: Vec::new(),
        }
    }

    /// The targets captured by the last `initialize`.
    pub fn targets(&self) -> &[MotorTarget] { &self.targets }

    /// The power sent to the drivetrain on every tick.
    pub fn drive_power(&self) -> f64 {
        if self.distance < 0.0 {
            DRIVE_STRAIGHT_POWER
        } else {
            -DRIVE_STRAIGHT_POWER
        }
    }

    fn is_motor_finished(&self, index: usize) -> bool {
        let Some(target) = self.targets.iter().find(|t| t.index == index) else {
            return false;
        };
        let Ok(drivetrain) = self.drivetrain.try_borrow() else {
            warn!("Drivetrain busy, skipping arrival check for motor {}", index);
            return false;
        };
        match drivetrain.motor_position(index) {
            Ok(current) => {
                trace!(
                    "Motor {}: current position: {}, desired position {}",
                    index,
                    current,
                    target.target_ticks
                );
                let finished = target.reached(current, self.distance);
                if finished {
                    info!("Motor {} finished", index);
                }
                finished
            }
            Err(e) => {
                warn!("Error Getting Motor Encoder Position: {}", e);
                false
            }
        }
    }
}

impl Task for PositionDriveController {
    fn name(&self) -> &str { &self.name }

    fn requirements(&self) -> SubsystemSet { SubsystemSet::of(Subsystem::Drivetrain) }

    fn initialize(&mut self) {
        let ticks = inches_to_ticks(self.distance);
        self.targets.clear();

        let Ok(drivetrain) = self.drivetrain.try_borrow() else {
            warn!("Drivetrain busy, no targets captured for {}", self.name);
            return;
        };
        let count = drivetrain.motor_count();
        if count > MAX_DRIVE_MOTORS {
            warn!(
                "Drivetrain reports {} motors, tracking the first {}",
                count, MAX_DRIVE_MOTORS
            );
        }

        for index in 0..count.min(MAX_DRIVE_MOTORS) {
            let start = drivetrain.motor_position(index).unwrap_or_else(|e| {
                warn!("Error Getting Motor Encoder Position: {}", e);
                0.0
            });
            // Capacity is checked above.
            let _ = self.targets.push(MotorTarget::new(index, count, start, ticks));
        }

        info!("{}: moving {:.1} ticks", self.name, ticks);
        for target in &self.targets {
            debug!(
                "Motor {}: start {:.1}, target {:.1}",
                target.index, target.start_ticks, target.target_ticks
            );
        }
    }

    fn execute(&mut self) {
        let power = self.drive_power();
        match self.drivetrain.try_borrow_mut() {
            Ok(mut drivetrain) => {
                if let Err(e) = drivetrain.drive_straight(power) {
                    warn!("Drive Command Error: {}", e);
                }
            }
            Err(_) => warn!("Drivetrain busy, drive command skipped"),
        }
    }

    fn is_finished(&self) -> bool {
        let [a, b] = if self.distance > 0.0 {
            FORWARD_CHECK_MOTORS
        } else {
            REVERSE_CHECK_MOTORS
        };
        self.is_motor_finished(a) || self.is_motor_finished(b)
    }

    fn end(&mut self) {
        match self.drivetrain.try_borrow_mut() {
            Ok(mut drivetrain) => {
                if let Err(e) = drivetrain.stop_all_motors() {
                    warn!("Drivetrain Stop Error: {}", e);
                }
            }
            Err(_) => error!("Drivetrain busy, stop command skipped"),
        }
    }
}
