//! Code implementing the logging solution for `vma`.
//!
//! Records are written to stderr so that they never interleave with the protocol output on
//! stdout.

use std::io::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Installs the `vma` logger, discarding every record less severe than `level`.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been installed.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
    static LOGGER: StderrLogger = StderrLogger;

    log::set_logger(&LOGGER)?;
    log::set_max_level(level.as_filter());
    Ok(())
}

/// Various levels to determine the priority of information.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum LogLevel {
    /// Logging is disabled.
    #[default]
    Off,
    /// Designates very serious logs.
    Error,
    /// Designates hazardous logs.
    Warn,
    /// Designates informatory logs.
    Info,
    /// Designates lower priority information.
    Debug,
    /// Designates very low priority information.
    Trace,
}

impl LogLevel {
    /// Returns the textual representation of the [`LogLevel`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Returns the [`LevelFilter`] corresponding to the [`LogLevel`].
    pub fn as_filter(&self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl clap::ValueEnum for LogLevel {
    fn value_variants<'a>() -> &'a [Self] {
        static LEVELS: &[LogLevel] = &[
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];

        LEVELS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Returns the prefix placed in front of every record logged at `level`.
fn prefix(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRACE: ",
        Level::Debug => "DEBUG: ",
        Level::Info => "INFO : ",
        Level::Warn => "WARN : ",
        Level::Error => "ERROR: ",
    }
}

/// A [`Log`] implementation writing one prefixed line per record to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Ignore any logging errors because there is no method to report or deal with them.
        let _ = writeln!(
            io::stderr().lock(),
            "{}{}",
            prefix(record.level()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
