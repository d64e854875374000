use std::{fmt, str::FromStr};

use log::LevelFilter;
use thiserror::Error;

/// Severity of a log record, ordered from the most verbose to the sentinel
/// `Disabled` which, used as a minimum, suppresses everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Level {
    #[default]
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Disabled = 6,
}

impl Level {
    /// Every level a record can carry, in ascending order.
    pub const EMITTING: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// The short tag written in front of every record.
    pub const fn tag(self) -> &'static str {
        match self {
            Level::Trace => "[T]",
            Level::Debug => "[D]",
            Level::Info => "[I]",
            Level::Warn => "[W]",
            Level::Error => "[E]",
            Level::Fatal => "[F]",
            Level::Disabled => "",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Disabled => "DISABLED",
        }
    }

    /// `true` when a record at `self` passes a `threshold` minimum.
    /// Usable in const context so call sites below a static threshold fold away.
    pub const fn at_least(self, threshold: Level) -> bool {
        self as u8 >= threshold as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "t" => Ok(Level::Trace),
            "debug" | "d" => Ok(Level::Debug),
            "info" | "i" => Ok(Level::Info),
            "warn" | "warning" | "w" => Ok(Level::Warn),
            "error" | "e" => Ok(Level::Error),
            "fatal" | "f" => Ok(Level::Fatal),
            "disabled" | "off" | "none" => Ok(Level::Disabled),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LevelFilter::Trace,
            Level::Debug => LevelFilter::Debug,
            Level::Info => LevelFilter::Info,
            Level::Warn => LevelFilter::Warn,
            Level::Error | Level::Fatal => LevelFilter::Error,
            Level::Disabled => LevelFilter::Off,
        }
    }
}
