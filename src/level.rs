//! # Severity Levels

use std::fmt;

/// Message passed from producers to the writer thread.
///
/// Records exist only as fully rendered text once they enter the queue;
/// no structured fields survive past formatting. `Shutdown` is the last
/// frame the channel accepts and tells the writer to drain and exit.
#[derive(Debug)]
pub enum Frame {
    /// A rendered log line, ready to be appended to the active file.
    Line(String),

    /// A special variant to indicate that the logger is shutting down.
    Shutdown,
}

/// Severity of a log record, also used as the file-sink threshold.
///
/// The levels follow increasing severity:
/// `Trace < Debug < Info < Warn < Error < Off`.
///
/// `Off` is only meaningful as a threshold: it suppresses every leveled
/// record and is never a record's own level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Fine-grained tracing output.
    Trace = 0,

    /// Development diagnostics.
    Debug = 1,

    /// General runtime events.
    Info = 2,

    /// Potential problems that do not stop execution.
    Warn = 3,

    /// Failed operations.
    Error = 4,

    /// Threshold-only value that silences all leveled records.
    Off = 5,
}

impl Level {
    /// Parses a configured threshold string.
    ///
    /// The match is case-insensitive over `OFF`, `TRACE`, `INFO`, `WARN` and
    /// `ERROR`; any other value (including `"DEBUG"` itself) falls back to
    /// [`Level::Debug`]. Misconfiguration therefore loosens filtering rather
    /// than failing.
    pub fn from_config(value: &str) -> Level {
        if value.eq_ignore_ascii_case("OFF") {
            Level::Off
        } else if value.eq_ignore_ascii_case("TRACE") {
            Level::Trace
        } else if value.eq_ignore_ascii_case("INFO") {
            Level::Info
        } else if value.eq_ignore_ascii_case("WARN") {
            Level::Warn
        } else if value.eq_ignore_ascii_case("ERROR") {
            Level::Error
        } else {
            Level::Debug
        }
    }

    /// Whether a record at `level` passes this threshold.
    ///
    /// `Off` as a threshold rejects everything, since no record carries
    /// `Off` as its level.
    pub fn allows(self, level: Level) -> bool {
        level >= self
    }

    /// The bracketed tag written to the file and the console.
    pub fn tag(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    /// ANSI escape for the console echo, or `None` for levels that are
    /// never echoed (Trace, and Off which never tags a record).
    pub fn console_color(self) -> Option<&'static str> {
        match self {
            Level::Debug => Some("\x1b[0;40;34m"),
            Level::Info => Some("\x1b[0;40;32m"),
            Level::Warn => Some("\x1b[0;40;33m"),
            Level::Error => Some("\x1b[0;40;31m"),
            Level::Trace | Level::Off => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod test_ordering {
        use super::*;

        #[test]
        fn test_ordinals_ascend() {
            assert!(Level::Trace < Level::Debug);
            assert!(Level::Debug < Level::Info);
            assert!(Level::Info < Level::Warn);
            assert!(Level::Warn < Level::Error);
            assert!(Level::Error < Level::Off);
        }

        #[test]
        fn test_allows_at_and_above_threshold() {
            assert!(Level::Info.allows(Level::Info));
            assert!(Level::Info.allows(Level::Warn));
            assert!(Level::Info.allows(Level::Error));
            assert!(!Level::Info.allows(Level::Debug));
            assert!(!Level::Info.allows(Level::Trace));
        }

        #[test]
        fn test_trace_threshold_allows_everything() {
            for level in [
                Level::Trace,
                Level::Debug,
                Level::Info,
                Level::Warn,
                Level::Error,
            ] {
                assert!(Level::Trace.allows(level));
            }
        }

        #[test]
        fn test_off_threshold_allows_nothing() {
            for level in [
                Level::Trace,
                Level::Debug,
                Level::Info,
                Level::Warn,
                Level::Error,
            ] {
                assert!(!Level::Off.allows(level));
            }
        }
    }

    mod test_parsing {
        use super::*;

        #[test]
        fn test_recognized_values() {
            assert_eq!(Level::from_config("OFF"), Level::Off);
            assert_eq!(Level::from_config("TRACE"), Level::Trace);
            assert_eq!(Level::from_config("INFO"), Level::Info);
            assert_eq!(Level::from_config("WARN"), Level::Warn);
            assert_eq!(Level::from_config("ERROR"), Level::Error);
        }

        #[test]
        fn test_case_insensitive() {
            assert_eq!(Level::from_config("error"), Level::Error);
            assert_eq!(Level::from_config("Error"), Level::Error);
            assert_eq!(Level::from_config("oFf"), Level::Off);
            assert_eq!(Level::from_config("warn"), Level::Warn);
        }

        #[test]
        fn test_unrecognized_falls_back_to_debug() {
            assert_eq!(Level::from_config("bogus"), Level::Debug);
            assert_eq!(Level::from_config(""), Level::Debug);
            // DEBUG is never matched explicitly; it lands on the fallback.
            assert_eq!(Level::from_config("DEBUG"), Level::Debug);
            assert_eq!(Level::from_config("debug"), Level::Debug);
        }
    }

    mod test_tags {
        use super::*;

        #[test]
        fn test_tags() {
            assert_eq!(Level::Trace.tag(), "TRACE");
            assert_eq!(Level::Error.tag(), "ERROR");
            assert_eq!(Level::Warn.to_string(), "WARN");
        }

        #[test]
        fn test_console_colors() {
            assert!(Level::Debug.console_color().is_some());
            assert!(Level::Info.console_color().is_some());
            assert!(Level::Warn.console_color().is_some());
            assert!(Level::Error.console_color().is_some());
            assert!(Level::Trace.console_color().is_none());
            assert!(Level::Off.console_color().is_none());
        }
    }
}
