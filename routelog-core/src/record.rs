use std::fmt;

use crate::level::Level;

/// Where a record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub file: &'a str,
    pub func: &'a str,
    pub line: u32,
}

/// One log call, built by the dispatcher and consumed by the active writer.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub level: Level,
    /// Module name given at the call site. `None` means the writer's own module name.
    pub module: Option<&'a str>,
    /// Absent when the call site does not propagate its source location.
    pub location: Option<Location<'a>>,
    pub message: fmt::Arguments<'a>,
}

impl<'a> LogRecord<'a> {
    pub fn new(
        level: Level,
        module: Option<&'a str>,
        location: Option<Location<'a>>,
        message: fmt::Arguments<'a>,
    ) -> Self {
        Self {
            level,
            module,
            location,
            message,
        }
    }

    /// The module name to render, falling back to `default`.
    pub fn module_or<'b>(&self, default: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.module.unwrap_or(default)
    }
}
