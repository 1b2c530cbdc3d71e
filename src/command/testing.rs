//! Test doubles for the task lifecycle.

use std::{cell::RefCell, rc::Rc};

use super::{SubsystemSet, Task};

/// A lifecycle callback observed by a [`Probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Initialize,
    Execute,
    End,
    Interrupted,
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// A task that records every lifecycle call and finishes after a fixed
/// number of `execute` calls.
pub struct Probe {
    name:         String,
    requirements: SubsystemSet,
    finish_after: Option<usize>,
    executed:     usize,
    log:          EventLog,
}

impl Probe {
    pub fn finishing_after(name: &str, executes: usize) -> (Self, EventLog) {
        Self::build(name, Some(executes))
    }

    pub fn never_finishing(name: &str) -> (Self, EventLog) { Self::build(name, None) }

    pub fn requiring(mut self, requirements: SubsystemSet) -> Self {
        self.requirements = requirements;
        self
    }

    fn build(name: &str, finish_after: Option<usize>) -> (Self, EventLog) {
        let log = EventLog::default();
        let probe = Probe {
            name: name.to_string(),
            requirements: SubsystemSet::EMPTY,
            finish_after,
            executed: 0,
            log: log.clone(),
        };
        (probe, log)
    }
}

impl Task for Probe {
    fn name(&self) -> &str { &self.name }

    fn requirements(&self) -> SubsystemSet { self.requirements }

    fn initialize(&mut self) { self.log.borrow_mut().push(Event::Initialize); }

    fn execute(&mut self) {
        self.executed += 1;
        self.log.borrow_mut().push(Event::Execute);
    }

    fn is_finished(&self) -> bool { self.finish_after.is_some_and(|n| self.executed >= n) }

    fn end(&mut self) { self.log.borrow_mut().push(Event::End); }

    fn interrupted(&mut self) { self.log.borrow_mut().push(Event::Interrupted); }
}
