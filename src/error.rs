//! # Error Handling

use std::fmt;

/// Represents all possible errors that can occur in the LogRotor system.
pub enum Error {
    /// Represents an underlying I/O error.
    ///
    /// Raised by the boot sequence when the active file cannot be opened,
    /// and by rotation when the rename or reopen fails.
    Io(std::io::Error),

    /// A configuration value could not be interpreted.
    ///
    /// Raised at startup when a boolean or numeric override is malformed.
    /// Note that an unrecognized `level` string is *not* an error: it falls
    /// back to the DEBUG threshold.
    Config(String),

    /// A background task (writer or rotation monitor) terminated abnormally.
    ///
    /// Surfaced from [`close`](crate::LogRotor::close) so the owning code has
    /// an observable signal instead of a silently degraded logger.
    TaskPanic(String),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => f.debug_tuple("Io").field(err).finish(),
            Error::Config(s) => f.debug_tuple("Config").field(s).finish(),
            Error::TaskPanic(s) => f.debug_tuple("TaskPanic").field(s).finish(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::Config(s) => write!(f, "Invalid configuration: {s}"),
            Error::TaskPanic(s) => write!(f, "Background task panicked: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
