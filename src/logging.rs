//! Colored stderr logger for the `log` facade

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        // Nowhere left to report a failed write to stderr
        let _ = writeln!(stderr, "{} {}", tag(record.level()), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "error".red().bold(),
        Level::Warn => " warn".yellow().bold(),
        Level::Info => " info".green(),
        Level::Debug => "debug".blue(),
        Level::Trace => "trace".bright_black(),
    }
}

/// Level for a `-v` count: warnings by default, then info, debug, trace
#[must_use]
pub const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger
///
/// # Errors
///
/// Returns an error if a logger is already installed.
pub fn init(verbosity: u8) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level_for(verbosity));
    Ok(())
}
