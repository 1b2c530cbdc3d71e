//! Console and file logger for the [`log`] facade.
//!
//! Every record is printed to the console and appended to `log.txt` in the
//! working directory (the SD card root on the robot). The file is truncated
//! when the logger is installed. If it cannot be opened the logger keeps
//! printing to the console only.
//!
//! ```text
//! INFO [12s 40ms] stronghold::auton::routine - Building autonomous routine LowBar/DriveAcross/Three with ...
//! INFO [14s 502ms] stronghold::motion::position - Motor 1 finished
//! ```

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    sync::{Mutex, OnceLock},
    time::Duration,
};

use humantime::{FormattedDuration, format_duration};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Where the log file is written.
pub const LOG_FILE: &str = "log.txt";

pub struct RobotLogger {
    /// `None` when the file could not be opened.
    file_writer: Mutex<Option<BufWriter<std::fs::File>>>,
    #[cfg(not(feature = "vexide"))]
    started:     std::time::Instant,
}

impl RobotLogger {
    fn new() -> Self {
        let file_writer = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(LOG_FILE)
            .ok()
            .map(BufWriter::new);

        Self {
            file_writer: Mutex::new(file_writer),
            #[cfg(not(feature = "vexide"))]
            started: std::time::Instant::now(),
        }
    }

    /// Time since the user program started.
    #[cfg(feature = "vexide")]
    fn uptime(&self) -> Duration { vexide::time::user_uptime() }

    /// Time since the logger was created.
    #[cfg(not(feature = "vexide"))]
    fn uptime(&self) -> Duration { self.started.elapsed() }

    fn timestamp(&self) -> FormattedDuration {
        // Whole milliseconds keep the line short.
        format_duration(Duration::from_millis(self.uptime().as_millis() as u64))
    }
}

impl log::Log for RobotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record, self.timestamp());

        print!("{}", line);

        if let Ok(mut guard) = self.file_writer.lock() {
            if let Some(writer) = guard.as_mut() {
                let _ = writer.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file_writer.lock() {
            if let Some(writer) = guard.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}

fn format_line(record: &Record, time: FormattedDuration) -> String {
    format!("{} [{}] {} - {}\n", record.level(), time, record.target(), record.args())
}

static LOGGER: OnceLock<RobotLogger> = OnceLock::new();

/// Installs the logger and sets the maximum level.
///
/// Call once at startup, before the first log macro.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(RobotLogger::new);
    log::set_logger(logger).map(|()| log::set_max_level(level))
}
