//! # LogRotor - Asynchronous File Logging with Daily Rotation
//!
//! LogRotor is a buffered, asynchronous logging library that appends leveled
//! records to a single active file and rotates that file once per calendar
//! day, with no external log-shipping dependency.
//!
//! ## Key Features
//!
//! - **Asynchronous Processing**: records are written by a dedicated worker
//!   thread; emit calls never touch the file
//! - **Bounded Queue**: producers block once the queue is full
//!   (backpressure, never silent drops)
//! - **Daily Rotation**: the active file becomes `{name}.{YYYY-MM-DD}` at
//!   the first check after midnight, watched by a background monitor
//! - **Sink Fan-Out**: each record is dispatched to a configurable set of
//!   sinks (colorized console echo, rotating file)
//! - **Configurable Filtering**: Trace/Debug/Info/Warn/Error threshold, with
//!   Off silencing every leveled record
//! - **Graceful Shutdown**: [`close`](LogRotor::close) drains the queue and
//!   acknowledges completion before the file handle is released
//!
//! ## Architecture
//!
//! The library uses a producer-consumer pattern:
//! - **Producers**: any thread calling an emit operation on [`LogRotor`];
//!   the record is rendered immediately and pushed onto the bounded channel
//! - **Consumer**: a single writer thread popping one line at a time and
//!   appending it under a shared read lock
//! - **Monitor**: an independent timer thread that rotates the file when a
//!   calendar-day boundary was crossed, taking the lock exclusively
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use log_rotor::{LogRotor, Settings};
//!
//! let logger = LogRotor::boot(Settings::default()).expect("logger boot failed");
//!
//! logger.info("Application started");
//! logger.warn("This is a warning");
//! logger.error("An error occurred");
//!
//! logger.close().expect("logger close failed");
//! ```
//!
//! ## Custom Configuration
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use log_rotor::{LogRotor, Settings};
//!
//! let mut overrides = HashMap::new();
//! overrides.insert("dir".to_string(), "/var/log/myservice".to_string());
//! overrides.insert("name".to_string(), "myservice.log".to_string());
//! overrides.insert("level".to_string(), "warn".to_string());
//!
//! let settings = Settings::from_hashmap(Some(overrides)).unwrap();
//! let logger = LogRotor::boot(settings).expect("logger boot failed");
//! // Use logger...
//! logger.close().unwrap();
//! ```
mod config;
mod error;
mod format;
mod level;
mod monitor;
mod rotor;
mod sink;
mod worker;

use std::fmt;
use std::sync::Arc;

use futures::channel::mpsc;
use futures::executor::block_on;
use futures::SinkExt;

pub use crate::config::Settings;
pub use crate::error::Error;
pub use crate::format::{CallSite, Class, Record};
pub use crate::level::{Frame, Level};
pub use crate::rotor::RotatingFile;
pub use crate::sink::{ConsoleSink, Dispatcher, FileSink, Sink};

use crate::monitor::Monitor;
use crate::worker::Worker;

/// The leveled logging interface, for call sites that take a logger by
/// generic parameter instead of the concrete [`LogRotor`].
///
/// Implementors must be `Send + Sync + 'static` so they can be shared across
/// thread boundaries.
pub trait Logger: Send + Sync + 'static {
    /// Logs a trace message.
    fn trace<S: AsRef<str>>(&self, message: S);

    /// Logs a debug message.
    fn debug<S: AsRef<str>>(&self, message: S);

    /// Logs an informational message.
    fn info<S: AsRef<str>>(&self, message: S);

    /// Logs a warning message.
    fn warn<S: AsRef<str>>(&self, message: S);

    /// Logs an error message.
    fn error<S: AsRef<str>>(&self, message: S);
}

/// The logging facade: one owned, independently configured sink instance.
///
/// `LogRotor` is constructed explicitly with [`boot`](LogRotor::boot) and
/// passed (or injected) to call sites; several instances with different
/// configurations can coexist in one process. All emit operations take
/// `&self` and are safe to call from any thread.
///
/// ## Lifecycle
///
/// 1. **Boot**: resolve settings, open (or rotate) the active file, start
///    the writer and the rotation monitor
/// 2. **Running**: emit operations render records and dispatch them to the
///    configured sinks
/// 3. **Close**: stop accepting records, drain the queue, await the writer's
///    acknowledgment, release the file handle
pub struct LogRotor {
    dispatcher: Dispatcher,
    /// The shared rotation state. Public so owners can observe the anchor or
    /// force conditions in tests, mirroring how the monitor drives it.
    pub rotor: Arc<RotatingFile>,
    sender: mpsc::Sender<Frame>,
    worker: Option<Worker>,
    monitor: Option<Monitor>,
}

impl LogRotor {
    /// Boots a logger from the given settings.
    ///
    /// Resolves the log directory (creating it when missing — a creation
    /// failure is logged and the file open decides the outcome), opens the
    /// active file or rotates a stale one, then starts the writer and the
    /// rotation monitor as background threads.
    ///
    /// # Errors
    ///
    /// Fails when the active file cannot be opened, a boot-time rotation
    /// fails, or a background thread cannot be spawned. On failure nothing
    /// keeps running: no logger state outlives the error.
    pub fn boot(settings: Settings) -> Result<LogRotor, Error> {
        let rotor = Arc::new(RotatingFile::open(
            settings.resolve_dir(),
            settings.name.clone(),
            settings.prefix.clone(),
        )?);

        let (sender, receiver) = mpsc::channel(settings.queue_capacity);

        let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
        if settings.console {
            sinks.push(Box::new(ConsoleSink));
        }
        sinks.push(Box::new(FileSink::new(settings.level, sender.clone())));
        let dispatcher = Dispatcher::new(sinks);

        let worker_id = format!("writer-{}", std::process::id());
        let worker = Worker::start(&worker_id, receiver, Arc::clone(&rotor))?;
        let monitor = Monitor::start(
            settings.check_interval,
            Arc::clone(&rotor),
            dispatcher.clone(),
        )?;

        Ok(LogRotor {
            dispatcher,
            rotor,
            sender,
            worker: Some(worker),
            monitor: Some(monitor),
        })
    }

    /// Gracefully shuts the logger down.
    ///
    /// Three phases: stop the rotation monitor and close the channel so no
    /// further records are accepted, send the shutdown frame so the worker
    /// drains everything queued before it, then join the worker — the
    /// explicit completion acknowledgment — and release the file handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskPanic`] if the writer or the monitor terminated
    /// abnormally; the file handle is released either way.
    pub fn close(mut self) -> Result<(), Error> {
        let monitor_result = match self.monitor.take() {
            Some(monitor) => monitor.stop(),
            None => Ok(()),
        };

        let mut sender = self.sender.clone();
        let _ = block_on(sender.send(Frame::Shutdown));
        sender.close_channel();

        let worker_result = match self.worker.take() {
            Some(worker) => worker.join(),
            None => Ok(()),
        };

        self.rotor.close();
        monitor_result?;
        worker_result
    }

    fn emit(&self, class: Class, site: CallSite, message: &str) {
        self.dispatcher.dispatch(&Record {
            class,
            site,
            message,
        });
    }

    /// Logs a trace message. Never echoed to the console.
    #[track_caller]
    pub fn trace<S: AsRef<str>>(&self, message: S) {
        self.emit(
            Class::Leveled(Level::Trace),
            CallSite::caller(),
            message.as_ref(),
        );
    }

    /// Logs a debug message.
    ///
    /// Reaches the file only when the threshold admits DEBUG; echoed to the
    /// console (blue) regardless of the threshold.
    #[track_caller]
    pub fn debug<S: AsRef<str>>(&self, message: S) {
        self.emit(
            Class::Leveled(Level::Debug),
            CallSite::caller(),
            message.as_ref(),
        );
    }

    /// Logs an informational message. Console echo is green.
    #[track_caller]
    pub fn info<S: AsRef<str>>(&self, message: S) {
        self.emit(
            Class::Leveled(Level::Info),
            CallSite::caller(),
            message.as_ref(),
        );
    }

    /// Logs a warning message. Console echo is yellow.
    #[track_caller]
    pub fn warn<S: AsRef<str>>(&self, message: S) {
        self.emit(
            Class::Leveled(Level::Warn),
            CallSite::caller(),
            message.as_ref(),
        );
    }

    /// Logs an error message. Console echo is red.
    #[track_caller]
    pub fn error<S: AsRef<str>>(&self, message: S) {
        self.emit(
            Class::Leveled(Level::Error),
            CallSite::caller(),
            message.as_ref(),
        );
    }

    /// Logs an unleveled message.
    ///
    /// Print-family records carry no level tag, bypass the threshold (even
    /// `Off`) and are never echoed to the console.
    #[track_caller]
    pub fn print<S: AsRef<str>>(&self, message: S) {
        self.emit(Class::Plain, CallSite::caller(), message.as_ref());
    }

    /// The format variant of [`print`](LogRotor::print).
    ///
    /// ```rust,no_run
    /// # let logger = log_rotor::LogRotor::boot(Default::default()).unwrap();
    /// logger.printf(format_args!("processed {} records", 128));
    /// ```
    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.emit(Class::Plain, CallSite::caller(), &args.to_string());
    }

    /// Line-call-convention twin of [`print`](LogRotor::print); the file
    /// writer is line-oriented, so both render identically.
    #[track_caller]
    pub fn println<S: AsRef<str>>(&self, message: S) {
        self.print(message);
    }

    /// Logs a fatal error and terminates the process with exit code 1.
    ///
    /// The record is tagged `[ERROR]`, bypasses the threshold, and a
    /// synchronous fallback copy goes to stderr before termination. The
    /// asynchronously queued copy is *not* guaranteed to reach the file
    /// before the process exits; immediate termination wins over
    /// durability here.
    #[track_caller]
    pub fn fatal<S: AsRef<str>>(&self, message: S) -> ! {
        let site = CallSite::caller();
        let message = message.as_ref();
        self.emit(Class::Fatal, site, message);
        eprintln!(
            "{} [ERROR] [{}:{}] {message}",
            crate::format::write_stamp(),
            site.base_file(),
            site.line()
        );
        std::process::exit(1);
    }

    /// Alias of [`fatal`](LogRotor::fatal), kept for call sites written
    /// against the adverb spelling.
    #[track_caller]
    pub fn fatally<S: AsRef<str>>(&self, message: S) -> ! {
        self.fatal(message)
    }
}

impl Logger for LogRotor {
    #[track_caller]
    fn trace<S: AsRef<str>>(&self, message: S) {
        LogRotor::trace(self, message);
    }

    #[track_caller]
    fn debug<S: AsRef<str>>(&self, message: S) {
        LogRotor::debug(self, message);
    }

    #[track_caller]
    fn info<S: AsRef<str>>(&self, message: S) {
        LogRotor::info(self, message);
    }

    #[track_caller]
    fn warn<S: AsRef<str>>(&self, message: S) {
        LogRotor::warn(self, message);
    }

    #[track_caller]
    fn error<S: AsRef<str>>(&self, message: S) {
        LogRotor::error(self, message);
    }
}
