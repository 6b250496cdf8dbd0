//! # Record Formatting
//!
//! A record is rendered exactly once, at emit time, into the line each sink
//! consumes. The file line carries a level tag (for leveled and fatal
//! records), the caller's source file base name and line number, and the
//! message; the line prefix and the write timestamp are added later by the
//! file writer. The console line additionally carries its own timestamp and
//! an ANSI color per level.

use chrono::Local;

use crate::level::Level;

/// Date stamp appended to rotated backup files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp prepended to every file line at write time, matching the
/// standard-logger rendering with microseconds.
pub const FILE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

/// Timestamp prepended to console echo lines.
pub const CONSOLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ANSI_RESET: &str = "\x1b[0m";

/// Classification of an emitted record, used by sinks to decide whether and
/// how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Print-family record: no level tag, never filtered, never echoed.
    Plain,

    /// A record at the given severity, subject to the file threshold.
    Leveled(Level),

    /// Fatal record: tagged ERROR, bypasses the threshold.
    Fatal,
}

/// The caller location of an emit operation.
///
/// The location is an explicit input captured at the immediate call site via
/// `#[track_caller]`, never inferred by counting stack frames, so wrapping an
/// emit call in a helper keeps attribution correct as long as the helper is
/// itself `#[track_caller]`.
#[derive(Debug, Clone, Copy)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Captures the location of the nearest non-`#[track_caller]` caller.
    #[track_caller]
    pub fn caller() -> CallSite {
        let location = std::panic::Location::caller();
        CallSite {
            file: location.file(),
            line: location.line(),
        }
    }

    #[cfg(test)]
    pub fn fixed(file: &'static str, line: u32) -> CallSite {
        CallSite { file, line }
    }

    /// The source file base name, stripped of any directory components.
    pub fn base_file(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A single emit, carried from the emit operation to the sinks.
#[derive(Debug)]
pub struct Record<'a> {
    pub class: Class,
    pub site: CallSite,
    pub message: &'a str,
}

/// Renders the body of a file line: `[LEVEL] [file:line] message` for leveled
/// records, `[file:line] message` for plain ones. Fatal records are tagged
/// ERROR.
pub fn file_line(record: &Record<'_>) -> String {
    let site = &record.site;
    match record.class {
        Class::Plain => {
            format!("[{}:{}] {}", site.base_file(), site.line(), record.message)
        }
        Class::Leveled(level) => format!(
            "[{}] [{}:{}] {}",
            level.tag(),
            site.base_file(),
            site.line(),
            record.message
        ),
        Class::Fatal => format!(
            "[{}] [{}:{}] {}",
            Level::Error.tag(),
            site.base_file(),
            site.line(),
            record.message
        ),
    }
}

/// Renders a colorized console line for a leveled record, or `None` for
/// levels without a console echo.
pub fn console_line(level: Level, record: &Record<'_>) -> Option<String> {
    let color = level.console_color()?;
    let stamp = Local::now().format(CONSOLE_TIME_FORMAT);
    Some(format!(
        "{stamp} {color}[{}] [{}:{}] {}{ANSI_RESET}",
        level.tag(),
        record.site.base_file(),
        record.site.line(),
        record.message
    ))
}

/// The timestamp the file writer prepends to every line.
pub fn write_stamp() -> String {
    Local::now().format(FILE_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(class: Class, message: &str) -> Record<'_> {
        Record {
            class,
            site: CallSite::fixed("src/handlers/auth.rs", 42),
            message,
        }
    }

    #[test]
    fn test_base_file_strips_directories() {
        assert_eq!(CallSite::fixed("src/a/b.rs", 1).base_file(), "b.rs");
        assert_eq!(CallSite::fixed("b.rs", 1).base_file(), "b.rs");
        assert_eq!(CallSite::fixed("src\\win\\c.rs", 1).base_file(), "c.rs");
    }

    #[test]
    fn test_caller_capture() {
        let site = CallSite::caller();
        assert_eq!(site.base_file(), "format.rs");
        assert!(site.line() > 0);
    }

    #[test]
    fn test_leveled_file_line() {
        let rec = record(Class::Leveled(Level::Warn), "disk nearly full");
        assert_eq!(file_line(&rec), "[WARN] [auth.rs:42] disk nearly full");
    }

    #[test]
    fn test_plain_file_line_has_no_tag() {
        let rec = record(Class::Plain, "hello");
        assert_eq!(file_line(&rec), "[auth.rs:42] hello");
    }

    #[test]
    fn test_fatal_file_line_is_error_tagged() {
        let rec = record(Class::Fatal, "cannot continue");
        assert_eq!(file_line(&rec), "[ERROR] [auth.rs:42] cannot continue");
    }

    #[test]
    fn test_console_line_colorized() {
        let rec = record(Class::Leveled(Level::Info), "started");
        let line = console_line(Level::Info, &rec).unwrap();
        assert!(line.contains("\x1b[0;40;32m"));
        assert!(line.contains("[INFO] [auth.rs:42] started"));
        assert!(line.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_console_line_skips_trace() {
        let rec = record(Class::Leveled(Level::Trace), "noise");
        assert!(console_line(Level::Trace, &rec).is_none());
    }
}
