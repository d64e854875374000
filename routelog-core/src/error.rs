use std::{fmt, io};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    /// A required parameter, such as the file path or the socket host, is missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The destination could not be opened, connected, or is already closed.
    #[error("{what} unavailable: {source}")]
    ResourceUnavailable {
        what: String,
        #[source]
        source: io::Error,
    },

    /// The destination was left out of this build.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("formatting the message failed")]
    Format(#[from] fmt::Error),
}

impl LogError {
    pub fn unavailable(what: impl Into<String>, source: io::Error) -> Self {
        LogError::ResourceUnavailable {
            what: what.into(),
            source,
        }
    }

    pub(crate) fn closed(what: &str) -> Self {
        Self::unavailable(
            what,
            io::Error::new(io::ErrorKind::NotConnected, "writer was shut down"),
        )
    }
}

/// Successful result of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record reached the destination; carries the number of bytes produced.
    Written(usize),
    /// The record was below a threshold and was legitimately suppressed.
    Filtered,
}

impl Outcome {
    pub fn is_filtered(&self) -> bool {
        matches!(self, Outcome::Filtered)
    }

    pub fn bytes_written(&self) -> usize {
        match self {
            Outcome::Written(bytes) => *bytes,
            Outcome::Filtered => 0,
        }
    }
}

/// Status returned by the call-site macros.
///
/// Unlike a bare `Result` it may be ignored without a warning, since a
/// failing log call only means the record was dropped.
#[derive(Debug)]
pub struct Status(Result<Outcome, LogError>);

impl Status {
    pub fn filtered() -> Self {
        Self(Ok(Outcome::Filtered))
    }

    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.0, Ok(Outcome::Filtered))
    }

    /// `0` on success (written or filtered), `-1` on failure.
    pub fn code(&self) -> i32 {
        if self.0.is_ok() { 0 } else { -1 }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.0.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&LogError> {
        self.0.as_ref().err()
    }

    pub fn into_result(self) -> Result<Outcome, LogError> {
        self.0
    }
}

impl From<Result<Outcome, LogError>> for Status {
    fn from(result: Result<Outcome, LogError>) -> Self {
        Self(result)
    }
}
