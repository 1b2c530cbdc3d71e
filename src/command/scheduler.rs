//! A cooperative, single-threaded task scheduler.
//!
//! The scheduler is driven by an outer loop at a fixed tick rate. Each call
//! to [`Scheduler::run`] performs exactly one tick for every active task.
//! There is no preemption inside a tick and no queuing: scheduling a task
//! whose requirements overlap an active task interrupts the active one.

use log::{debug, info};

use super::{Subsystem, Task, TaskState, Tracked};

/// Owns the active tasks and arbitrates subsystem claims between them.
#[derive(Default)]
pub struct Scheduler {
    active: Vec<Tracked>,
}

impl Scheduler {
    pub fn new() -> Self { Self::default() }

    /// Adds a task to the active set.
    ///
    /// Every active task whose requirements intersect the new task's is
    /// interrupted first. The new task is initialized on the next
    /// [`run`](Scheduler::run).
    pub fn schedule(&mut self, task: Box<dyn Task>) {
        let requirements = task.requirements();
        for running in &mut self.active {
            if running.requirements().intersects(requirements) && running.interrupt() {
                info!(
                    "{} interrupted by {} (requires {})",
                    running.name(),
                    task.name(),
                    requirements
                );
            }
        }
        self.prune();
        debug!("scheduled {}", task.name());
        self.active.push(Tracked::new(task));
    }

    /// Performs one tick: initializes new tasks, executes every active task
    /// and ends the ones that report finished.
    pub fn run(&mut self) {
        for task in &mut self.active {
            if task.tick() == TaskState::Finished {
                debug!("{} finished", task.name());
            }
        }
        self.prune();
    }

    /// Interrupts every task, e.g. when the match period ends.
    pub fn cancel_all(&mut self) {
        for task in &mut self.active {
            if task.interrupt() {
                info!("{} cancelled", task.name());
            }
        }
        self.active.clear();
    }

    pub fn is_scheduled(&self, name: &str) -> bool { self.active.iter().any(|t| t.name() == name) }

    pub fn active_count(&self) -> usize { self.active.len() }

    /// The name of the task currently claiming `subsystem`, if any.
    pub fn claimed(&self, subsystem: Subsystem) -> Option<&str> {
        self.active
            .iter()
            .find(|t| t.requirements().contains(subsystem))
            .map(|t| t.name())
    }

    fn prune(&mut self) { self.active.retain(|t| !t.state().is_terminal()); }
}
