use std::sync::OnceLock;
use std::thread;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::PROGRAM_LOG_LEVEL;

const DEFAULT_LEVEL: Level = Level::Warn;

enum LogTarget {
    Stderr,
}

pub struct Logger {
    level: Level,
    target: LogTarget,
}

impl Logger {
    fn format(&self, record: &Record<'_>) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let current = thread::current();
        let thread_name = current.name().unwrap_or("-");
        format!(
            "{} {} ({}) [{}] {}",
            timestamp,
            record.level(),
            thread_name,
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let msg = self.format(record);

            match &self.target {
                LogTarget::Stderr => {
                    eprintln!("{msg}")
                }
            }
        }
    }

    fn flush(&self) {}
}

fn parse_level(value: &str) -> Option<Level> {
    value
        .parse::<LevelFilter>()
        .ok()
        .and_then(|filter| filter.to_level())
}

/// `DONKEY_LOG_LEVEL` wins, then `fallback` (usually from the settings
/// file), then `warn`.
fn resolve_level(fallback: Option<&str>) -> Level {
    std::env::var(PROGRAM_LOG_LEVEL)
        .ok()
        .and_then(|s| parse_level(&s))
        .or_else(|| fallback.and_then(parse_level))
        .unwrap_or(DEFAULT_LEVEL)
}

pub fn init() -> Result<(), SetLoggerError> {
    _init(resolve_level(None))
}

pub fn init_with_fallback(fallback: Option<&str>) -> Result<(), SetLoggerError> {
    _init(resolve_level(fallback))
}

pub fn _init(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    // Only the first call installs the logger and sets the max level,
    // later calls would otherwise disagree with the level the logger was
    // built with.
    let init_call = LOGGER.get().is_none();

    let logger = LOGGER.get_or_init(|| Logger {
        level,
        target: LogTarget::Stderr,
    });

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(level.to_level_filter());
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
