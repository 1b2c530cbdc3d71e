//! The task lifecycle contract.
//!
//! A task moves through `Pending → Initialized → Running → {Finished |
//! Interrupted}`. The [`Tracked`] wrapper owns a task and enforces the order
//! of calls, so the scheduler and task groups never have to re-check it.

use super::SubsystemSet;

/// An atomic unit of cooperative robot work.
///
/// The scheduler is the only caller of these methods. It calls
/// [`initialize`](Task::initialize) once, then [`execute`](Task::execute)
/// once per tick until [`is_finished`](Task::is_finished) returns `true`, then
/// [`end`](Task::end) once. If a conflicting task is scheduled first,
/// [`interrupted`](Task::interrupted) is called instead of `end`.
///
/// Neither `execute` nor `is_finished` may block.
pub trait Task {
    /// A human-readable label used in logs and scheduler queries.
    fn name(&self) -> &str;

    /// The subsystems this task claims while it is active.
    fn requirements(&self) -> SubsystemSet { SubsystemSet::EMPTY }

    /// One-time setup, called when the scheduler first activates the task.
    fn initialize(&mut self) {}

    /// Per-tick work. Must be safe to call repeatedly.
    fn execute(&mut self);

    /// Whether the task is done. Must not have side effects on task state.
    fn is_finished(&self) -> bool;

    /// Cleanup after `is_finished` returned `true`.
    fn end(&mut self) {}

    /// Cleanup after being interrupted. Defaults to [`end`](Task::end).
    fn interrupted(&mut self) { self.end(); }
}

/// Where a task is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Scheduled but not yet activated.
    Pending,
    /// `initialize` has run, `execute` has not.
    Initialized,
    /// `execute` has run at least once.
    Running,
    /// `end` has run. The task is inert.
    Finished,
    /// `interrupted` has run (or the task was dropped before activation).
    Interrupted,
}

impl TaskState {
    /// True once the task can no longer receive calls.
    pub fn is_terminal(self) -> bool { matches!(self, TaskState::Finished | TaskState::Interrupted) }

    /// True while the task has been initialized and is not yet terminal.
    pub fn is_active(self) -> bool { matches!(self, TaskState::Initialized | TaskState::Running) }
}

/// A boxed task paired with its lifecycle state.
pub struct Tracked {
    task:  Box<dyn Task>,
    state: TaskState,
}

impl Tracked {
    pub fn new(task: Box<dyn Task>) -> Self {
        Self {
            task,
            state: TaskState::Pending,
        }
    }

    pub fn state(&self) -> TaskState { self.state }

    pub fn name(&self) -> &str { self.task.name() }

    pub fn requirements(&self) -> SubsystemSet { self.task.requirements() }

    /// Forwards to the task's completion check.
    pub fn is_finished(&self) -> bool { self.task.is_finished() }

    /// Runs `initialize` if the task is still pending.
    pub fn start(&mut self) {
        if self.state == TaskState::Pending {
            self.task.initialize();
            self.state = TaskState::Initialized;
        }
    }

    /// Runs one scheduler tick and returns the resulting state.
    ///
    /// A pending task is initialized first. A task whose `is_finished` holds
    /// after `execute` is ended in the same tick. Terminal tasks are left
    /// untouched.
    pub fn tick(&mut self) -> TaskState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.start();
        self.task.execute();
        self.state = TaskState::Running;
        if self.task.is_finished() {
            self.task.end();
            self.state = TaskState::Finished;
        }
        self.state
    }

    /// Interrupts the task.
    ///
    /// Returns `true` if the task's `interrupted` hook ran. A pending task is
    /// discarded without any callback, and a terminal task is left alone.
    pub fn interrupt(&mut self) -> bool {
        match self.state {
            TaskState::Initialized | TaskState::Running => {
                self.task.interrupted();
                self.state = TaskState::Interrupted;
                true
            }
            TaskState::Pending => {
                self.state = TaskState::Interrupted;
                false
            }
            TaskState::Finished | TaskState::Interrupted => false,
        }
    }
}
