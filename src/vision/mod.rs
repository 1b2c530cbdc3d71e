//! Vision target telemetry.
//!
//! The vision coprocessor publishes named values (`FPS`, `TargetX`, ...) over
//! a key/value channel. [`VisionTelemetry`] is the writer side: it applies
//! each incoming pair to a fresh copy of the current [`VisionSnapshot`] and
//! swaps the whole record in at once. Tasks hold a [`VisionView`], a cheap
//! read-only handle that always returns a complete snapshot.
//!
//! The writer may live on another thread than the scheduler.
//!
//! # Example
//!
//! ```ignore
//! let telemetry = VisionTelemetry::new();
//! let view = telemetry.view();
//!
//! // From the network listener:
//! telemetry.apply("TargetX", 142.0.into());
//!
//! // From a task:
//! if view.snapshot().targets_acquired > 0 { /* aim */ }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use log::{trace, warn};

/// The latest values published by the vision system.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionSnapshot {
    pub driver_request:   String,
    pub fps:              i32,
    pub targets_acquired: i32,
    pub target_x:         i32,
    pub target_y:         i32,
    pub target_size:      i32,
    pub target_response:  f64,
    pub target_class:     i32,
}

impl Default for VisionSnapshot {
    fn default() -> Self {
        Self {
            driver_request:   "init".to_string(),
            fps:              0,
            targets_acquired: 0,
            target_x:         0,
            target_y:         0,
            target_size:      0,
            target_response:  0.0,
            target_class:     0,
        }
    }
}

/// A value received on the telemetry channel.
///
/// The channel stores every number as a double, even integer fields.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Number(f64),
    Text(String),
}

impl From<f64> for TelemetryValue {
    fn from(value: f64) -> Self { TelemetryValue::Number(value) }
}

impl From<&str> for TelemetryValue {
    fn from(value: &str) -> Self { TelemetryValue::Text(value.to_string()) }
}

impl From<String> for TelemetryValue {
    fn from(value: String) -> Self { TelemetryValue::Text(value) }
}

impl VisionSnapshot {
    /// Returns a copy with `key` set to `value`, or `None` if the key is
    /// unknown or the value has the wrong type.
    ///
    /// Integer fields truncate toward zero.
    pub fn with_update(&self, key: &str, value: &TelemetryValue) -> Option<VisionSnapshot> {
        let mut next = self.clone();
        match (key, value) {
            ("DriverRequest", TelemetryValue::Text(s)) => next.driver_request = s.clone(),
            ("TargetResponse", TelemetryValue::Number(n)) => next.target_response = *n,
            (_, TelemetryValue::Number(n)) => {
                let field = match key {
                    "FPS" => &mut next.fps,
                    "TargetsAcquired" => &mut next.targets_acquired,
                    "TargetX" => &mut next.target_x,
                    "TargetY" => &mut next.target_y,
                    "TargetSize" => &mut next.target_size,
                    "TargetClass" => &mut next.target_class,
                    _ => return None,
                };
                *field = *n as i32;
            }
            _ => return None,
        }
        Some(next)
    }
}

type Slot = Arc<Mutex<Arc<VisionSnapshot>>>;

/// Writer side of the vision telemetry.
#[derive(Debug, Clone, Default)]
pub struct VisionTelemetry {
    current: Slot,
}

impl VisionTelemetry {
    pub fn new() -> Self { Self::default() }

    /// Applies one key/value pair. Returns `false` if it was ignored.
    pub fn apply(&self, key: &str, value: TelemetryValue) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match current.with_update(key, &value) {
            Some(next) => {
                trace!("vision {} = {:?}", key, value);
                *current = Arc::new(next);
                true
            }
            None => {
                if is_known_key(key) {
                    warn!("Vision value for {} has the wrong type: {:?}", key, value);
                }
                false
            }
        }
    }

    /// Replaces the whole snapshot at once.
    pub fn replace(&self, snapshot: VisionSnapshot) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }

    /// A read-only handle for tasks.
    pub fn view(&self) -> VisionView {
        VisionView {
            current: self.current.clone(),
        }
    }
}

fn is_known_key(key: &str) -> bool {
    matches!(
        key,
        "DriverRequest"
            | "FPS"
            | "TargetsAcquired"
            | "TargetX"
            | "TargetY"
            | "TargetSize"
            | "TargetResponse"
            | "TargetClass"
    )
}

/// Read-only access to the latest [`VisionSnapshot`].
#[derive(Debug, Clone)]
pub struct VisionView {
    current: Slot,
}

impl VisionView {
    /// The most recent complete snapshot.
    pub fn snapshot(&self) -> Arc<VisionSnapshot> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
