//! # Stronghold
//!
//! Autonomous control for a competition robot built around cooperative
//! tasks. It contains:
//!
//! - **Tasks and scheduling**: a five-phase [`Task`](command::Task) lifecycle,
//!   sequential/parallel [`TaskGroup`](command::TaskGroup)s, and a
//!   [`Scheduler`](command::Scheduler) that interrupts tasks competing for the
//!   same subsystem.
//! - **Routine building**: turns the pre-match selection (obstacle, strategy,
//!   start position) into a task group from compiled-in tables.
//! - **Position drive**: drives a set distance by encoder targets.
//! - **Mechanisms**: the limit-switch gated portcullis lifter.
//! - **Vision**: a read-only view of the vision coprocessor's telemetry.
//! - **Logging**: a console and file logger.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stronghold::{
//!     auton::routine::{self, RobotTasks},
//!     command::Scheduler,
//!     config::RobotConfig,
//!     shared,
//! };
//!
//! let config = RobotConfig::load_or_default("config.json");
//! let drivetrain = shared(my_drivetrain);
//! let mut tasks = RobotTasks::new(drivetrain, Some(shared(my_portcullis)), my_other_tasks);
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.schedule(Box::new(routine::build(config.routine, config.modules, &mut tasks)));
//! loop {
//!     scheduler.run();
//!     // wait for the next tick
//! }
//! ```

use std::{cell::RefCell, rc::Rc};

/// Autonomous routine selection and building.
pub mod auton;

/// Tasks, task groups, subsystems and the scheduler.
pub mod command;

/// Feature flags and the JSON robot config.
pub mod config;

/// The drivetrain boundary, an in-memory drivetrain, and the VEX adapter.
pub mod drivetrain;

pub mod error;

/// Filesystem utilities including logging.
pub mod fs;

/// Mechanisms other than the drivetrain.
pub mod mechanisms;

/// Distance conversion and the position drive controller.
pub mod motion;

/// Vision telemetry snapshot and read-only view.
pub mod vision;

/// Wraps a device so it can be shared between tasks.
///
/// The result coerces to the crate's shared handle types, e.g.
/// [`SharedDrivetrain`](drivetrain::SharedDrivetrain).
pub fn shared<T>(t: T) -> Rc<RefCell<T>> { Rc::new(RefCell::new(t)) }
