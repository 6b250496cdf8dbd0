//! # Configuration Module
//!
//! [`Settings`] is the seam between the logger and whatever configuration
//! collaborator the application uses: values arrive as a
//! `HashMap<String, String>` of overrides (parsed from a config file, the
//! environment, CLI flags, ...) and come out as an owned, validated value.
//!
//! There is deliberately no global configuration object here: each
//! [`LogRotor`](crate::LogRotor) instance is constructed from its own
//! `Settings`, so several independently configured loggers can coexist in
//! one process.
//!
//! ## Keys
//!
//! - `"dir"`: base or relative log directory (default `"logs"`)
//! - `"relative"`: `"true"`/`"false"`, resolve `dir` against the project root
//! - `"name"`: active file name (default `"app.log"`)
//! - `"prefix"`: string prepended to every file line
//! - `"level"`: case-insensitive one of OFF/TRACE/INFO/WARN/ERROR; anything
//!   else falls back to DEBUG
//! - `"console"`: `"true"`/`"false"`, enable the colorized console sink
//! - `"queue_capacity"`: bounded queue slots (default 8000)
//! - `"check_interval_ms"`: rotation check interval (default 30000)
//!
//! Malformed boolean or numeric values are configuration errors and fail the
//! boot instead of silently becoming zero values.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;
use crate::level::Level;

/// Queue slots between producers and the writer thread.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8000;

/// How often the monitor checks whether a day boundary was crossed.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Validated logger configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Log directory, base or relative depending on `relative`.
    pub dir: String,
    /// Whether `dir` is resolved against the project root.
    pub relative: bool,
    /// Active file name; backups get a `.{YYYY-MM-DD}` suffix.
    pub name: String,
    /// Prefix prepended to every file line.
    pub prefix: String,
    /// Minimum severity that reaches the file sink.
    pub level: Level,
    /// Whether leveled records are echoed to the console.
    pub console: bool,
    /// Bounded queue capacity; producers block once it is full.
    pub queue_capacity: usize,
    /// Rotation monitor tick interval.
    pub check_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dir: "logs".to_string(),
            relative: false,
            name: "app.log".to_string(),
            prefix: String::new(),
            level: Level::Debug,
            console: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl Settings {
    /// Builds settings from optional key/value overrides.
    ///
    /// Missing keys keep their defaults. A malformed boolean or number is an
    /// [`Error::Config`]; an unrecognized `level` string is not an error and
    /// behaves as DEBUG.
    pub fn from_hashmap(overrides: Option<HashMap<String, String>>) -> Result<Settings, Error> {
        let mut settings = Settings::default();
        let Some(map) = overrides else {
            return Ok(settings);
        };

        if let Some(dir) = map.get("dir") {
            settings.dir = dir.clone();
        }
        if let Some(relative) = map.get("relative") {
            settings.relative = parse_bool("relative", relative)?;
        }
        if let Some(name) = map.get("name") {
            settings.name = name.clone();
        }
        if let Some(prefix) = map.get("prefix") {
            settings.prefix = prefix.clone();
        }
        if let Some(level) = map.get("level") {
            settings.level = Level::from_config(level);
        }
        if let Some(console) = map.get("console") {
            settings.console = parse_bool("console", console)?;
        }
        if let Some(capacity) = map.get("queue_capacity") {
            settings.queue_capacity = capacity.parse().map_err(|_| {
                Error::Config(format!("bad number for `queue_capacity`: {capacity}"))
            })?;
        }
        if let Some(interval) = map.get("check_interval_ms") {
            let millis: u64 = interval.parse().map_err(|_| {
                Error::Config(format!("bad number for `check_interval_ms`: {interval}"))
            })?;
            settings.check_interval = Duration::from_millis(millis);
        }

        Ok(settings)
    }

    /// The directory the active file lives in.
    ///
    /// With `relative` set, `dir` is joined onto the project root; otherwise
    /// it is taken as given.
    pub fn resolve_dir(&self) -> PathBuf {
        if self.relative {
            project_root().join(&self.dir)
        } else {
            PathBuf::from(&self.dir)
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::Config(format!("bad boolean for `{key}`: {value}")))
    }
}

/// The directory one level above the running executable's directory,
/// falling back to the current working directory.
fn project_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(|dir| dir.parent()).map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
