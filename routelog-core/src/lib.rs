//! # routelog-core
//! Core utilities for routelog: levels, records, the writer contract and the
//! file, console and socket writers.
//!
//! The socket writer is behind the `socket` feature, enabled by default.

mod bounded;
mod config;
pub mod diag;
mod error;
mod level;
mod log_writer;
mod record;
#[cfg(feature = "socket")]
mod socket;
mod timestamp;

pub use bounded::BoundedName;
pub use config::{ROUTELOG_CONFIG, RoutelogConfig};
pub use error::{LogError, Outcome, Status};
pub use level::{Level, ParseLevelError};
pub use log_writer::{
    ConsoleParams, ConsoleStream, FileParams, LogWriter, OpenMode, SocketParams, StreamWriter,
};
pub use record::{Location, LogRecord};
#[cfg(feature = "socket")]
pub use socket::{SocketWriter, Transport};
pub use timestamp::{TIMESTAMP_FORMAT, banner};
