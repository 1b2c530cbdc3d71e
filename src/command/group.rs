//! Sequential and parallel composition of tasks.
//!
//! A [`TaskGroup`] holds an ordered list of children, each added either
//! sequentially or in parallel:
//!
//! - **Sequential** children form the group's spine. They run one at a time
//!   in declaration order, and the next one starts only after its predecessor
//!   has finished.
//! - **Parallel** children are started when the spine reaches them and then
//!   run alongside it. The spine never waits for them.
//!
//! The group is finished once its last sequential child has finished. Any
//! parallel child still running at that point is interrupted, as is every
//! active child when the group itself is interrupted.
//!
//! Children follow the scheduler's one-owner rule: starting a child
//! interrupts any active sibling that needs one of the same subsystems.
//!
//! A sequential child that never finishes stalls the whole group. That is
//! accepted behavior for limit-switch gated mechanisms.
//!
//! # Example
//!
//! ```ignore
//! let mut group = TaskGroup::new("shoot");
//! group.add_sequential(Box::new(rotate));
//! group.add_parallel(Box::new(aim));      // starts once `rotate` is done
//! group.add_sequential(Box::new(angle));  // runs alongside `aim`
//! group.add_sequential(Box::new(launch));
//! ```

use log::{debug, trace};

use super::{SubsystemSet, Task, TaskState, Tracked};

/// How a child is attached to its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sequential,
    Parallel,
}

struct Child {
    task: Tracked,
    mode: Mode,
}

/// An ordered composition of tasks that is itself a [`Task`].
pub struct TaskGroup {
    name:         String,
    children:     Vec<Child>,
    /// Index of the next child the spine will reach.
    cursor:       usize,
    requirements: SubsystemSet,
}

impl TaskGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:         name.into(),
            children:     Vec::new(),
            cursor:       0,
            requirements: SubsystemSet::EMPTY,
        }
    }

    /// Appends a child to the sequential spine.
    pub fn add_sequential(&mut self, task: Box<dyn Task>) { self.push(task, Mode::Sequential); }

    /// Appends a child that starts when the spine reaches it and then runs
    /// alongside it.
    pub fn add_parallel(&mut self, task: Box<dyn Task>) { self.push(task, Mode::Parallel); }

    /// Appends a child with an explicit [`Mode`].
    pub fn push(&mut self, task: Box<dyn Task>, mode: Mode) {
        self.requirements = self.requirements.union(task.requirements());
        self.children.push(Child {
            task: Tracked::new(task),
            mode,
        });
    }

    pub fn len(&self) -> usize { self.children.len() }

    pub fn is_empty(&self) -> bool { self.children.is_empty() }

    /// The children's names and modes, in declaration order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, Mode)> + '_ {
        self.children.iter().map(|c| (c.task.name(), c.mode))
    }

    /// Starts every parallel child at the cursor and moves the cursor to the
    /// next sequential child.
    fn launch_parallel(&mut self) {
        while let Some(child) = self.children.get_mut(self.cursor) {
            if child.mode != Mode::Parallel {
                break;
            }
            debug!("{}: starting parallel child {}", self.name, child.task.name());
            self.release_conflicts(self.cursor);
            self.children[self.cursor].task.start();
            self.cursor += 1;
        }
    }

    /// Interrupts every active child that shares a subsystem with the child
    /// at `index`, which is about to start.
    fn release_conflicts(&mut self, index: usize) {
        let needed = self.children[index].task.requirements();
        if needed.is_empty() {
            return;
        }
        for (i, child) in self.children.iter_mut().enumerate() {
            if i != index
                && child.task.state().is_active()
                && child.task.requirements().intersects(needed)
                && child.task.interrupt()
            {
                debug!("{}: child {} gave up {}", self.name, child.task.name(), needed);
            }
        }
    }

    fn interrupt_active(&mut self) {
        for child in &mut self.children {
            if child.task.state().is_active() && child.task.interrupt() {
                debug!("{}: interrupted child {}", self.name, child.task.name());
            }
        }
    }
}

impl Task for TaskGroup {
    fn name(&self) -> &str { &self.name }

    fn requirements(&self) -> SubsystemSet { self.requirements }

    fn initialize(&mut self) {
        self.cursor = 0;
        self.launch_parallel();
    }

    fn execute(&mut self) {
        self.launch_parallel();
        if self.children.get(self.cursor).is_some_and(|c| c.task.state() == TaskState::Pending) {
            self.release_conflicts(self.cursor);
        }

        let cursor = self.cursor;
        for (i, child) in self.children.iter_mut().enumerate() {
            if child.mode == Mode::Parallel && i < cursor && child.task.state().is_active() {
                child.task.tick();
            }
        }

        if let Some(child) = self.children.get_mut(self.cursor) {
            if child.task.tick() == TaskState::Finished {
                trace!("{}: child {} finished", self.name, child.task.name());
                self.cursor += 1;
                self.launch_parallel();
            }
        }
    }

    fn is_finished(&self) -> bool { self.cursor >= self.children.len() }

    fn end(&mut self) { self.interrupt_active(); }

    fn interrupted(&mut self) { self.interrupt_active(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{
        Subsystem,
        testing::{Event, Probe},
    };

    fn run_to_completion(group: &mut Tracked, max_ticks: usize) -> usize {
        for tick in 1..=max_ticks {
            if group.tick() == TaskState::Finished {
                return tick;
            }
        }
        panic!("group did not finish within {} ticks", max_ticks);
    }

    #[test]
    fn sequential_children_run_in_order() {
        let (first, first_log) = Probe::finishing_after("first", 2);
        let (second, second_log) = Probe::finishing_after("second", 1);

        let mut group = TaskGroup::new("seq");
        group.add_sequential(Box::new(first));
        group.add_sequential(Box::new(second));
        let mut group = Tracked::new(Box::new(group));

        group.tick();
        assert!(second_log.borrow().is_empty());
        group.tick();
        assert_eq!(*first_log.borrow().last().unwrap(), Event::End);
        assert!(second_log.borrow().is_empty());

        assert_eq!(group.tick(), TaskState::Finished);
        assert_eq!(*second_log.borrow(), vec![Event::Initialize, Event::Execute, Event::End]);
    }

    #[test]
    fn parallel_child_does_not_block_spine() {
        let (aim, aim_log) = Probe::never_finishing("aim");
        let (angle, _) = Probe::finishing_after("angle", 1);
        let (launch, launch_log) = Probe::finishing_after("launch", 1);

        let mut group = TaskGroup::new("shoot");
        group.add_parallel(Box::new(aim));
        group.add_sequential(Box::new(angle));
        group.add_sequential(Box::new(launch));

        let ticks = run_to_completion(&mut Tracked::new(Box::new(group)), 10);
        assert_eq!(ticks, 2);

        assert_eq!(*launch_log.borrow().last().unwrap(), Event::End);
        // The aim task ran alongside the spine and was cleaned up at the end.
        assert_eq!(
            *aim_log.borrow(),
            vec![Event::Initialize, Event::Execute, Event::Execute, Event::Interrupted]
        );
    }

    #[test]
    fn sequential_child_takes_subsystem_from_parallel_child() {
        let launcher = SubsystemSet::of(Subsystem::Launcher);
        let (aim, aim_log) = Probe::never_finishing("aim");
        let (angle, angle_log) = Probe::finishing_after("angle", 2);

        let mut group = TaskGroup::new("shoot");
        group.add_parallel(Box::new(aim.requiring(launcher)));
        group.add_sequential(Box::new(angle.requiring(launcher)));
        let mut group = Tracked::new(Box::new(group));

        group.tick();
        assert_eq!(*aim_log.borrow(), vec![Event::Initialize, Event::Interrupted]);
        assert_eq!(*angle_log.borrow(), vec![Event::Initialize, Event::Execute]);

        assert_eq!(group.tick(), TaskState::Finished);
        assert_eq!(*aim_log.borrow(), vec![Event::Initialize, Event::Interrupted]);
        assert_eq!(*angle_log.borrow().last().unwrap(), Event::End);
    }

    #[test]
    fn parallel_child_takes_subsystem_from_earlier_parallel_child() {
        let launcher = SubsystemSet::of(Subsystem::Launcher);
        let (first, first_log) = Probe::never_finishing("first");
        let (rotate, rotate_log) = Probe::finishing_after("rotate", 1);
        let (second, second_log) = Probe::never_finishing("second");

        let mut group = TaskGroup::new("group");
        group.add_parallel(Box::new(first.requiring(launcher)));
        group.add_sequential(Box::new(rotate.requiring(Subsystem::Drivetrain.into())));
        group.add_parallel(Box::new(second.requiring(launcher)));
        let mut group = Tracked::new(Box::new(group));

        assert_eq!(group.tick(), TaskState::Finished);
        assert_eq!(*first_log.borrow(), vec![Event::Initialize, Event::Execute, Event::Interrupted]);
        assert_eq!(*rotate_log.borrow(), vec![Event::Initialize, Event::Execute, Event::End]);
        // Started when the spine reached it, cleaned up when the group ended.
        assert_eq!(*second_log.borrow(), vec![Event::Initialize, Event::Interrupted]);
    }

    #[test]
    fn parallel_child_starts_after_preceding_sequential() {
        let (rotate, _) = Probe::finishing_after("rotate", 2);
        let (aim, aim_log) = Probe::finishing_after("aim", 1);
        let (launch, _) = Probe::finishing_after("launch", 3);

        let mut group = TaskGroup::new("shoot");
        group.add_sequential(Box::new(rotate));
        group.add_parallel(Box::new(aim));
        group.add_sequential(Box::new(launch));
        let mut group = Tracked::new(Box::new(group));

        group.tick();
        assert!(aim_log.borrow().is_empty());
        group.tick();
        assert_eq!(*aim_log.borrow(), vec![Event::Initialize]);
        group.tick();
        assert_eq!(*aim_log.borrow(), vec![Event::Initialize, Event::Execute, Event::End]);
    }

    #[test]
    fn stalled_child_stalls_group() {
        let (stuck, _) = Probe::never_finishing("portcullis down");
        let (drive, drive_log) = Probe::finishing_after("drive", 1);

        let mut group = TaskGroup::new("stall");
        group.add_sequential(Box::new(stuck));
        group.add_sequential(Box::new(drive));
        let mut group = Tracked::new(Box::new(group));

        for _ in 0..50 {
            assert_eq!(group.tick(), TaskState::Running);
        }
        assert!(drive_log.borrow().is_empty());
    }

    #[test]
    fn interruption_reaches_active_children_only() {
        let (done, done_log) = Probe::finishing_after("done", 1);
        let (aim, aim_log) = Probe::never_finishing("aim");
        let (active, active_log) = Probe::never_finishing("active");
        let (later, later_log) = Probe::finishing_after("later", 1);

        let mut group = TaskGroup::new("group");
        group.add_sequential(Box::new(done));
        group.add_parallel(Box::new(aim));
        group.add_sequential(Box::new(active));
        group.add_sequential(Box::new(later));
        let mut group = Tracked::new(Box::new(group));

        group.tick();
        group.tick();
        assert!(group.interrupt());

        assert_eq!(*done_log.borrow().last().unwrap(), Event::End);
        assert_eq!(*aim_log.borrow().last().unwrap(), Event::Interrupted);
        assert_eq!(*active_log.borrow().last().unwrap(), Event::Interrupted);
        assert!(later_log.borrow().is_empty());
    }

    #[test]
    fn requirements_are_the_union_of_children() {
        let (drive, _) = Probe::finishing_after("drive", 1);
        let (launch, _) = Probe::finishing_after("launch", 1);

        let mut group = TaskGroup::new("group");
        group.add_sequential(Box::new(drive.requiring(Subsystem::Drivetrain.into())));
        group.add_parallel(Box::new(launch.requiring(Subsystem::Launcher.into())));

        let reqs = group.requirements();
        assert!(reqs.contains(Subsystem::Drivetrain));
        assert!(reqs.contains(Subsystem::Launcher));
        assert!(!reqs.contains(Subsystem::Portcullis));
    }

    #[test]
    fn empty_group_finishes_immediately() {
        let mut group = Tracked::new(Box::new(TaskGroup::new("empty")));
        assert_eq!(group.tick(), TaskState::Finished);
    }

    #[test]
    fn is_finished_is_stable_between_ticks() {
        let (only, _) = Probe::finishing_after("only", 1);
        let mut group = TaskGroup::new("group");
        group.add_sequential(Box::new(only));
        group.initialize();

        assert_eq!(group.is_finished(), group.is_finished());
        group.execute();
        assert!(group.is_finished());
        assert!(group.is_finished());
    }
}
