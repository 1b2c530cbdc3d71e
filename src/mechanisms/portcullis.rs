//! Portcullis lifter.
//!
//! The lifter is a single motor between two limit switches. Moving it is a
//! [`Task`] that drives the motor toward one end and finishes when that end's
//! switch closes. If a switch never closes the task never finishes, and a
//! routine waiting on it stalls there.

use std::{cell::RefCell, rc::Rc};

use log::{debug, info, warn};

use crate::{
    command::{Subsystem, SubsystemSet, Task},
    error::DeviceError,
};

/// Power magnitude used to move the lifter.
pub const PORTCULLIS_POWER: f64 = 0.6;

/// The portcullis lifter hardware.
pub trait Portcullis {
    /// Drives the lifter motor. Positive power raises the arm.
    fn set_power(&mut self, power: f64) -> Result<(), DeviceError>;

    /// Cuts the lifter motor output.
    fn disable(&mut self) -> Result<(), DeviceError>;

    /// True while the upper limit switch is pressed.
    fn top_switch(&self) -> Result<bool, DeviceError>;

    /// True while the lower limit switch is pressed.
    fn bottom_switch(&self) -> Result<bool, DeviceError>;
}

/// A portcullis handle shared between the tasks that use it.
pub type SharedPortcullis = Rc<RefCell<dyn Portcullis>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Travel {
    Up,
    Down,
}

impl Travel {
    fn power(self) -> f64 {
        match self {
            Travel::Up => PORTCULLIS_POWER,
            Travel::Down => -PORTCULLIS_POWER,
        }
    }
}

/// Moves the portcullis lifter to one end of its travel.
pub struct PortcullisMove {
    portcullis: SharedPortcullis,
    travel:     Travel,
}

impl PortcullisMove {
    pub fn new(portcullis: SharedPortcullis, travel: Travel) -> Self { Self { portcullis, travel } }

    pub fn up(portcullis: SharedPortcullis) -> Self { Self::new(portcullis, Travel::Up) }

    pub fn down(portcullis: SharedPortcullis) -> Self { Self::new(portcullis, Travel::Down) }

    fn at_limit(&self, portcullis: &dyn Portcullis) -> bool {
        let switch = match self.travel {
            Travel::Up => portcullis.top_switch(),
            Travel::Down => portcullis.bottom_switch(),
        };
        switch.unwrap_or_else(|e| {
            warn!("Portcullis Limit Switch Error: {}", e);
            false
        })
    }
}

impl Task for PortcullisMove {
    fn name(&self) -> &str {
        match self.travel {
            Travel::Up => "portcullis up",
            Travel::Down => "portcullis down",
        }
    }

    fn requirements(&self) -> SubsystemSet { SubsystemSet::of(Subsystem::Portcullis) }

    fn execute(&mut self) {
        let Ok(mut portcullis) = self.portcullis.try_borrow_mut() else {
            warn!("Portcullis busy, move skipped");
            return;
        };
        debug!("Moving portcullis {:?}", self.travel);
        if let Err(e) = portcullis.set_power(self.travel.power()) {
            warn!("Portcullis Motor Error: {}", e);
        }
        if self.at_limit(&*portcullis) {
            info!("Portcullis reached {:?} limit", self.travel);
            if let Err(e) = portcullis.disable() {
                warn!("Portcullis Motor Error: {}", e);
            }
        }
    }

    fn is_finished(&self) -> bool {
        match self.portcullis.try_borrow() {
            Ok(portcullis) => self.at_limit(&*portcullis),
            Err(_) => false,
        }
    }

    fn end(&mut self) {
        match self.portcullis.try_borrow_mut() {
            Ok(mut portcullis) => {
                if let Err(e) = portcullis.disable() {
                    warn!("Portcullis Motor Error: {}", e);
                }
            }
            Err(_) => warn!("Portcullis busy, disable skipped"),
        }
    }
}
