//! Side channel for the library's own diagnostics.
//!
//! Failures of the logging subsystem are never raised to the host process;
//! they are reported here, one line on stderr each, and the record is dropped.

#[cfg(test)]
use std::cell::RefCell;
use std::{fmt, io::Write};

use colored::{ColoredString, Colorize};

use crate::config::ROUTELOG_CONFIG;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Notice,
    Warn,
    Error,
}

impl Severity {
    fn tag(self) -> ColoredString {
        match self {
            Severity::Notice => "[routelog]".cyan(),
            Severity::Warn => "[routelog]".yellow(),
            Severity::Error => "[routelog]".red(),
        }
    }
}

#[cfg(test)]
thread_local! {
    /// Diagnostics raised on this thread while [`capture`] runs.
    static CAPTURED: RefCell<Option<Vec<(Severity, String)>>> = const { RefCell::new(None) };
}

/// Records the line instead of printing it while a capture is running.
#[cfg(test)]
fn captured(severity: Severity, message: fmt::Arguments<'_>) -> bool {
    CAPTURED.with_borrow_mut(|captured| match captured {
        Some(lines) => {
            lines.push((severity, message.to_string()));
            true
        }
        None => false,
    })
}

#[cfg(not(test))]
fn captured(_: Severity, _: fmt::Arguments<'_>) -> bool {
    false
}

fn emit(severity: Severity, message: fmt::Arguments<'_>) {
    if captured(severity, message) || !ROUTELOG_CONFIG.DIAGNOSTICS {
        return;
    }
    let mut stderr = std::io::stderr().lock();
    writeln!(stderr, "{} {message}", severity.tag()).ok();
}

/// Runs `f`, collecting the diagnostics it raises instead of printing them.
#[cfg(test)]
pub(crate) fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<(Severity, String)>) {
    CAPTURED.with_borrow_mut(|captured| *captured = Some(Vec::new()));
    let result = f();
    let lines = CAPTURED.with_borrow_mut(Option::take).unwrap_or_default();
    (result, lines)
}

/// Lifecycle information, such as the lazy fallback to the console.
pub fn notice(message: fmt::Arguments<'_>) {
    emit(Severity::Notice, message);
}

/// Degraded but successful operations, such as a truncated frame.
pub fn warn(message: fmt::Arguments<'_>) {
    emit(Severity::Warn, message);
}

/// Failed operations. The caller also receives the error.
pub fn error(message: fmt::Arguments<'_>) {
    emit(Severity::Error, message);
}
