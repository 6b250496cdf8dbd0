//! # Writer Loop
//!
//! The single consumer of the bounded queue. The worker runs in its own
//! thread, pops one frame at a time and appends it to the rotating file,
//! holding the file lock only in read mode for the duration of each write —
//! writes still serialize against each other because there is exactly one
//! writer thread, while rotation takes the lock exclusively.
//!
//! The loop exits on a [`Frame::Shutdown`] or when the channel closes; by
//! FIFO order everything queued before the shutdown frame is on disk by the
//! time the thread exits, so joining the thread is the drain acknowledgment
//! the close protocol waits for.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use futures::channel::mpsc::Receiver;
use futures::executor::LocalPool;
use futures::stream::StreamExt;

use crate::error::Error;
use crate::level::Frame;
use crate::rotor::RotatingFile;

/// The background writer task.
#[derive(Debug)]
pub struct Worker {
    /// Identifier used for the thread name and panic reports.
    pub worker_id: String,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns the writer thread and begins draining the queue.
    pub fn start(
        worker_id: &str,
        receiver: Receiver<Frame>,
        rotor: Arc<RotatingFile>,
    ) -> Result<Worker, Error> {
        let handle = thread::Builder::new()
            .name(format!("Worker {worker_id}"))
            .spawn(move || {
                let mut pool = LocalPool::new();
                pool.run_until(async move {
                    let mut receiver = receiver;
                    Worker::drain(&mut receiver, &rotor).await;
                })
            })?;

        Ok(Worker {
            worker_id: worker_id.to_string(),
            handle: Some(handle),
        })
    }

    /// Pops frames until shutdown or channel closure, writing each line.
    ///
    /// Frames the producers enqueued before the shutdown frame are written
    /// before the loop exits; anything after it is discarded with the
    /// channel.
    pub async fn drain(receiver: &mut Receiver<Frame>, rotor: &RotatingFile) {
        loop {
            match receiver.next().await {
                Some(Frame::Line(line)) => rotor.write_line(&line),
                Some(Frame::Shutdown) => break,
                None => break, // channel closed
            }
        }
    }

    /// Waits for the writer thread to finish.
    ///
    /// A panicked thread surfaces as [`Error::TaskPanic`] so the owner gets
    /// an observable signal instead of a silently stopped writer.
    pub fn join(mut self) -> Result<(), Error> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle.join().map_err(|payload| {
            Error::TaskPanic(format!("{}: {}", self.worker_id, panic_message(&payload)))
        })
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use futures::executor::block_on;
    use futures::SinkExt;
    use std::fs;
    use tempfile::TempDir;

    fn test_rotor(dir: &TempDir) -> Arc<RotatingFile> {
        Arc::new(
            RotatingFile::open(
                dir.path().to_path_buf(),
                "app.log".to_string(),
                String::new(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_drain_writes_lines_in_order() {
        let dir = TempDir::new().unwrap();
        let rotor = test_rotor(&dir);
        let (mut sender, mut receiver) = mpsc::channel(8);

        block_on(async {
            sender
                .send(Frame::Line("[INFO] [a.rs:1] first".into()))
                .await
                .unwrap();
            sender
                .send(Frame::Line("[INFO] [a.rs:2] second".into()))
                .await
                .unwrap();
            sender.send(Frame::Shutdown).await.unwrap();
        });

        block_on(Worker::drain(&mut receiver, &rotor));

        let contents = fs::read_to_string(rotor.active_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn test_drain_stops_at_shutdown_frame() {
        let dir = TempDir::new().unwrap();
        let rotor = test_rotor(&dir);
        let (mut sender, mut receiver) = mpsc::channel(8);

        block_on(async {
            sender.send(Frame::Line("kept".into())).await.unwrap();
            sender.send(Frame::Shutdown).await.unwrap();
            sender.send(Frame::Line("discarded".into())).await.unwrap();
        });

        block_on(Worker::drain(&mut receiver, &rotor));

        let contents = fs::read_to_string(rotor.active_path()).unwrap();
        assert!(contents.contains("kept"));
        assert!(!contents.contains("discarded"));
    }

    #[test]
    fn test_drain_exits_on_closed_channel() {
        let dir = TempDir::new().unwrap();
        let rotor = test_rotor(&dir);
        let (sender, mut receiver) = mpsc::channel::<Frame>(8);
        drop(sender);

        // Must return promptly instead of waiting forever.
        block_on(Worker::drain(&mut receiver, &rotor));
    }

    #[test]
    fn test_start_and_join() {
        let dir = TempDir::new().unwrap();
        let rotor = test_rotor(&dir);
        let (mut sender, receiver) = mpsc::channel(8);

        let worker = Worker::start("test-writer", receiver, Arc::clone(&rotor)).unwrap();
        assert_eq!(worker.worker_id, "test-writer");

        block_on(async {
            sender.send(Frame::Line("via thread".into())).await.unwrap();
            sender.send(Frame::Shutdown).await.unwrap();
        });

        worker.join().unwrap();
        let contents = fs::read_to_string(rotor.active_path()).unwrap();
        assert!(contents.contains("via thread"));
    }
}
