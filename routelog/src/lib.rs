//! # routelog
//! Thread-safe leveled logger routing every record to one destination: a
//! file, the console or a remote listener over TCP.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! routelog = "0.1.0"
//! ```
//!
//! ```rust
//! // Without initialization, the first record installs a console logger on stdout.
//! routelog::info!("Hello, world!");
//! ```
//!
//! ## Logging to files
//! The file is truncated by default, or appended to with [`FileParams::append`].
//! Re-initializing closes the previous destination before opening the new one.
//!
//! ```rust
//! use routelog::{FileParams, Logger};
//!
//! let logger = Logger::new();
//! logger
//!     .init(FileParams::new("/tmp/routelog_doc_app.log").with_module_name("app"))
//!     .expect("Unable to open log file");
//! routelog::info!(logger: &logger, "Hello, world!");
//! routelog::func_entry!(logger: &logger);
//! logger.deinit().unwrap();
//!
//! let content = std::fs::read_to_string("/tmp/routelog_doc_app.log").unwrap();
//! assert!(content.contains(":Hello, world!\n"));
//! assert!(content.ends_with("{ main \n"));
//! ```
//!
//! ## Logging to a socket
//! Requires the `socket` feature, enabled by default.
//!
//! ```rust,no_run
//! use routelog::{Level, SocketParams};
//!
//! routelog::init_logger(
//!     SocketParams::new("127.0.0.1", 50007)
//!         .with_min_level(Level::Info)
//!         .with_module_name("HTTP Module"),
//! )
//! .expect("log server unreachable");
//! routelog::warn!("connection pool exhausted");
//! routelog::deinit_logger().unwrap();
//! ```
//!
//! ## Filtering
//! Records are filtered twice. At runtime, the active writer drops records
//! below its minimum level. At compile time, calls below a [`Scope`]'s minimum
//! level, or below [`STATIC_MIN_LEVEL`] (set with the `static_min_level_*`
//! features), are removed entirely.

pub mod bridge;
mod logger;
mod macros;
mod scope;

use std::sync::LazyLock;

pub use logger::{Destination, Fallback, Logger};
pub use routelog_core::{
    ConsoleParams, ConsoleStream, FileParams, Level, Location, LogError, LogRecord, LogWriter,
    OpenMode, Outcome, SocketParams, Status, StreamWriter,
};
#[cfg(feature = "socket")]
pub use routelog_core::{SocketWriter, Transport};
pub use scope::Scope;

/// Crate-wide static minimum level, chosen with the `static_min_level_*` features.
pub const STATIC_MIN_LEVEL: Level = if cfg!(feature = "static_min_level_disabled") {
    Level::Disabled
} else if cfg!(feature = "static_min_level_fatal") {
    Level::Fatal
} else if cfg!(feature = "static_min_level_error") {
    Level::Error
} else if cfg!(feature = "static_min_level_warn") {
    Level::Warn
} else if cfg!(feature = "static_min_level_info") {
    Level::Info
} else if cfg!(feature = "static_min_level_debug") {
    Level::Debug
} else {
    Level::Trace
};

/// Process-wide logger used by the macros when no `logger:` is given.
static GLOBAL_LOGGER: LazyLock<Logger> = LazyLock::new(Logger::new);

/// The process-wide logger.
pub fn global() -> &'static Logger {
    &GLOBAL_LOGGER
}

/// Initializes the process-wide logger, replacing any active destination.
pub fn init_logger(destination: impl Into<Destination>) -> Result<(), LogError> {
    let result = global().init(destination);
    bridge::sync_max_level();
    result
}

/// Shuts down the process-wide logger. Harmless when nothing is active.
pub fn deinit_logger() -> Result<(), LogError> {
    let result = global().deinit();
    bridge::sync_max_level();
    result
}

#[doc(hidden)]
pub mod __private {
    use std::fmt;

    use routelog_core::Location;

    use crate::{Level, LogError, Logger, Outcome, Scope};

    pub fn type_name_of<T>(_: T) -> &'static str {
        std::any::type_name::<T>()
    }

    /// Last path segment of a function's type name, skipping closures.
    pub fn function_name(path: &'static str) -> &'static str {
        let mut path = path.strip_suffix("::__here").unwrap_or(path);
        while let Some(outer) = path.strip_suffix("::{{closure}}") {
            path = outer;
        }
        path.rsplit("::").next().unwrap_or(path)
    }

    pub fn dispatch(
        logger: &Logger,
        scope: &Scope,
        level: Level,
        file: &'static str,
        func: &'static str,
        line: u32,
        message: fmt::Arguments<'_>,
    ) -> Result<Outcome, LogError> {
        let location = (!cfg!(feature = "no_location")).then(|| Location {
            file: scope.file(file),
            func,
            line,
        });
        logger.dispatch(level, scope.module_name(), location, message)
    }
}
