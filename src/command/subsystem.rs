//! Subsystems and requirement sets.
//!
//! Every task declares the set of subsystems it needs. The scheduler uses
//! these sets to keep at most one active task per subsystem.

use std::fmt;

/// A physical actuator cluster that can be claimed by one task at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// The four-motor chassis.
    Drivetrain,
    /// The intake/launcher mechanism.
    Launcher,
    /// The portcullis lifter arm.
    Portcullis,
    /// The vision-guided aiming pipeline.
    Vision,
}

impl Subsystem {
    /// Every subsystem, in bit order.
    pub const ALL: [Subsystem; 4] = [
        Subsystem::Drivetrain,
        Subsystem::Launcher,
        Subsystem::Portcullis,
        Subsystem::Vision,
    ];

    const fn bit(self) -> u8 { 1 << (self as u8) }
}

/// A small set of [`Subsystem`]s, stored as a bitmask.
///
/// # Example
///
/// ```ignore
/// let reqs = SubsystemSet::of(Subsystem::Drivetrain).with(Subsystem::Launcher);
/// assert!(reqs.contains(Subsystem::Launcher));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SubsystemSet(u8);

impl SubsystemSet {
    /// The empty set. Tasks with no requirements never interrupt anything.
    pub const EMPTY: SubsystemSet = SubsystemSet(0);

    /// A set holding a single subsystem.
    pub const fn of(subsystem: Subsystem) -> Self { SubsystemSet(subsystem.bit()) }

    /// Returns this set with `subsystem` added.
    pub const fn with(self, subsystem: Subsystem) -> Self { SubsystemSet(self.0 | subsystem.bit()) }

    /// Returns the union of both sets.
    pub const fn union(self, other: SubsystemSet) -> Self { SubsystemSet(self.0 | other.0) }

    pub const fn contains(self, subsystem: Subsystem) -> bool { self.0 & subsystem.bit() != 0 }

    /// True when both sets claim at least one common subsystem.
    pub const fn intersects(self, other: SubsystemSet) -> bool { self.0 & other.0 != 0 }

    pub const fn is_empty(self) -> bool { self.0 == 0 }

    /// Iterates the subsystems in this set.
    pub fn iter(self) -> impl Iterator<Item = Subsystem> {
        Subsystem::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl From<Subsystem> for SubsystemSet {
    fn from(subsystem: Subsystem) -> Self { SubsystemSet::of(subsystem) }
}

impl fmt::Display for SubsystemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, subsystem) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", subsystem)?;
        }
        write!(f, "}}")
    }
}
