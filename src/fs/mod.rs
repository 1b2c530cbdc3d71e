//! Filesystem utilities.
//!
//! # Example
//!
//! ```ignore
//! use log::{LevelFilter, info};
//! use stronghold::fs::logger;
//!
//! logger::init(LevelFilter::Debug).expect("Failed to initialize logger");
//! info!("Robot initialized");
//! ```

/// Console and `log.txt` logger.
pub mod logger;
