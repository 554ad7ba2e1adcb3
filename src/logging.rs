//! Logging collaborator.
//!
//! Configuration documents may carry `logFile` and `logLevel` directives. The
//! loader forwards them to a [`LogSink`] instead of touching process state
//! directly. [`ProcessLogger`] is the sink used by real processes: it is a
//! `log` backend whose `env_logger` formatter is rebuilt whenever the level
//! or the output file changes.

use log::{debug, warn, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Receives the logging directives found in a configuration document
pub trait LogSink {
    fn set_log_file(&self, path: &Path);
    fn set_log_level(&self, level: &str);
}

/// Sink that ignores every directive
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn set_log_file(&self, _path: &Path) {}
    fn set_log_level(&self, _level: &str) {}
}

/// Map a level name to a filter.
///
/// Accepts `debug`, `verbose`, `error` and `panic` as well as the `log`
/// crate's own names. Matching is case-insensitive.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "debug" => Some(LevelFilter::Debug),
        "verbose" => Some(LevelFilter::Info),
        "error" | "panic" => Some(LevelFilter::Error),
        other => other.parse().ok(),
    }
}

struct LoggerState {
    level: LevelFilter,
    file: Option<File>,
    logger: env_logger::Logger,
}

impl LoggerState {
    fn new(level: LevelFilter) -> Self {
        LoggerState {
            level,
            file: None,
            logger: build_logger(level, None),
        }
    }

    fn rebuild(&mut self) {
        self.logger = build_logger(self.level, self.file.as_ref());
    }
}

fn build_logger(level: LevelFilter, file: Option<&File>) -> env_logger::Logger {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);

    match file.and_then(|f| f.try_clone().ok()) {
        Some(file) => {
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .write_style(env_logger::WriteStyle::Never);
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.build()
}

/// Process-wide logger that can be retargeted after start-up
pub struct ProcessLogger {
    state: RwLock<LoggerState>,
}

impl ProcessLogger {
    /// Create a logger writing to stderr at `level`
    pub fn new(level: LevelFilter) -> Self {
        ProcessLogger {
            state: RwLock::new(LoggerState::new(level)),
        }
    }

    /// Install the process logger as the `log` backend.
    ///
    /// Only the first call takes effect; later calls return an error.
    pub fn install(level: LevelFilter) -> Result<&'static ProcessLogger, SetLoggerError> {
        static LOGGER: OnceLock<ProcessLogger> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| ProcessLogger::new(level));
        log::set_logger(logger)?;
        log::set_max_level(LevelFilter::Trace);
        Ok(logger)
    }

    /// Current level filter
    pub fn level(&self) -> LevelFilter {
        self.read_state().level
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LoggerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LoggerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Log for ProcessLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.read_state().logger.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        self.read_state().logger.log(record);
    }

    fn flush(&self) {
        self.read_state().logger.flush();
    }
}

// Diagnostics are emitted only after the state lock is released, since the
// process logger may be the one receiving them.
impl LogSink for ProcessLogger {
    fn set_log_file(&self, path: &Path) {
        if path.as_os_str().is_empty() {
            return;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to open log file {}: {}", path.display(), e);
                return;
            }
        };

        {
            let mut state = self.write_state();
            state.file = Some(file);
            state.rebuild();
        }
        debug!("Log output redirected to {}", path.display());
    }

    fn set_log_level(&self, level: &str) {
        let Some(filter) = parse_level(level) else {
            warn!("Unknown log level {:?}, keeping the current level", level);
            return;
        };

        let mut state = self.write_state();
        state.level = filter;
        state.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("Verbose"), Some(LevelFilter::Info));
        assert_eq!(parse_level("panic"), Some(LevelFilter::Error));
        assert_eq!(parse_level("warn"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("trace"), Some(LevelFilter::Trace));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_level_changes() {
        let logger = ProcessLogger::new(LevelFilter::Error);
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));

        logger.set_log_level("debug");
        assert_eq!(logger.level(), LevelFilter::Debug);
        assert!(logger.enabled(&Metadata::builder().level(Level::Debug).build()));

        logger.set_log_level("nonsense");
        assert_eq!(logger.level(), LevelFilter::Debug);
    }

    #[test]
    fn test_log_file_receives_records() {
        let file = NamedTempFile::new().unwrap();
        let logger = ProcessLogger::new(LevelFilter::Info);
        logger.set_log_file(file.path());

        logger.log(
            &Record::builder()
                .args(format_args!("delegate bridge configured"))
                .level(Level::Info)
                .target("multinet")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("filtered out"))
                .level(Level::Trace)
                .target("multinet")
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("delegate bridge configured"));
        assert!(!content.contains("filtered out"));
    }

    #[test]
    fn test_unopenable_log_file_keeps_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ProcessLogger::new(LevelFilter::Info);
        // A directory cannot be opened for appending
        logger.set_log_file(dir.path());
        assert!(logger.read_state().file.is_none());
    }
}
