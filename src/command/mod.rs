//! Cooperative task scheduling.
//!
//! Robot behavior is broken into [`Task`]s, small units of work that the
//! [`Scheduler`] ticks from a single control loop. Tasks declare the
//! [`Subsystem`]s they need; scheduling a task that needs an already-claimed
//! subsystem interrupts the current owner.
//!
//! # Module Structure
//!
//! - **[`task`]**: The lifecycle trait and the [`Tracked`] state wrapper.
//! - **[`subsystem`]**: Subsystems and requirement sets.
//! - **[`group`]**: Sequential/parallel composition with [`TaskGroup`].
//! - **[`scheduler`]**: The tick loop and requirement arbitration.
//!
//! # Example
//!
//! ```ignore
//! use stronghold::command::{Scheduler, TaskGroup};
//!
//! let mut routine = TaskGroup::new("auton");
//! routine.add_sequential(Box::new(drive));
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.schedule(Box::new(routine));
//! loop {
//!     scheduler.run();
//!     sleep(Duration::from_millis(20));
//! }
//! ```

/// Sequential and parallel task composition.
pub mod group;

/// The cooperative tick loop.
pub mod scheduler;

/// Subsystem claims.
pub mod subsystem;

/// The task lifecycle contract.
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use group::{Mode, TaskGroup};
pub use scheduler::Scheduler;
pub use subsystem::{Subsystem, SubsystemSet};
pub use task::{Task, TaskState, Tracked};
