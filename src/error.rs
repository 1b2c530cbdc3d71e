//! Error types shared across the crate.
//!
//! Hardware errors never escape a task's `execute`/`is_finished`; tasks log
//! them with [`log::warn`] and fall back to a safe value. They are still
//! returned as `Result`s from the device boundaries so adapters can report
//! what went wrong.

/// Errors reported by a device boundary (drivetrain, portcullis).
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// A motor index outside of the device's motor list was requested.
    #[error("motor index {index} out of range (device has {count} motors)")]
    MotorIndex { index: usize, count: usize },

    /// The device handle is already borrowed by another caller this tick.
    #[error("device handle busy")]
    Busy,

    /// The underlying hardware rejected the read or write.
    #[error("device error: {0}")]
    Device(String),
}

/// Errors raised while loading the robot configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
