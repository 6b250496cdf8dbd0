//! # Sink Fan-Out
//!
//! Every emit operation funnels into one [`Dispatcher`], which hands the
//! record to each configured sink. Sinks decide for themselves whether a
//! record concerns them: the console sink echoes Debug through Error
//! immediately and unbuffered, the file sink applies the severity threshold
//! and pushes the rendered line onto the bounded queue. Adding another
//! destination means adding another [`Sink`], not another branch per emit
//! operation.

use std::sync::{Arc, Mutex};

use futures::channel::mpsc;
use futures::executor::block_on;
use futures::SinkExt;

use crate::format::{self, Class, Record};
use crate::level::{Frame, Level};

/// A destination records are dispatched to.
pub trait Sink: Send + Sync {
    /// Offers a record to this sink. Sinks not interested in the record's
    /// class simply ignore it.
    fn submit(&self, record: &Record<'_>);
}

/// Fans a record out to every configured sink.
///
/// Cheap to clone; the rotation monitor holds one so rotation failures can
/// travel the ordinary ERROR path.
#[derive(Clone)]
pub struct Dispatcher {
    sinks: Arc<Vec<Box<dyn Sink>>>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Dispatcher {
        Dispatcher {
            sinks: Arc::new(sinks),
        }
    }

    pub fn dispatch(&self, record: &Record<'_>) {
        for sink in self.sinks.iter() {
            sink.submit(record);
        }
    }
}

/// Synchronous colorized console echo for Debug/Info/Warn/Error records.
///
/// Independent of the queue and of the file threshold; best-effort, with no
/// backpressure or drop policy beyond what stdout itself provides.
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn submit(&self, record: &Record<'_>) {
        let Class::Leveled(level) = record.class else {
            return;
        };
        if let Some(line) = format::console_line(level, record) {
            println!("{line}");
        }
    }
}

/// The file-bound sink: applies the threshold, renders the disk line and
/// pushes it onto the bounded queue.
///
/// The push blocks while the queue is full (backpressure, never drop) and
/// never touches the file itself. Once the channel is closed during shutdown
/// the push fails silently, which is the "stop accepting new records" phase.
pub struct FileSink {
    threshold: Level,
    /// A single shared sender: bounded `futures` senders each reserve their
    /// own slot, so cloning one per emit would quietly grow the capacity.
    sender: Mutex<mpsc::Sender<Frame>>,
}

impl FileSink {
    pub fn new(threshold: Level, sender: mpsc::Sender<Frame>) -> FileSink {
        FileSink {
            threshold,
            sender: Mutex::new(sender),
        }
    }
}

impl Sink for FileSink {
    fn submit(&self, record: &Record<'_>) {
        match record.class {
            // Print-family records never consult the threshold.
            Class::Plain | Class::Fatal => {}
            Class::Leveled(level) => {
                if !self.threshold.allows(level) {
                    return;
                }
            }
        }

        let line = format::file_line(record);
        if let Ok(mut sender) = self.sender.lock() {
            let _ = block_on(sender.send(Frame::Line(line)));
        }
    }
}
