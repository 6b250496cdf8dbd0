//! # Rotation Monitor
//!
//! A fixed-interval timer thread that checks whether a calendar-day boundary
//! was crossed and triggers rotation when it was. A failed rotation is
//! reported through the ordinary ERROR dispatch path and retried at the next
//! tick; there is no backoff and no retry limit.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{select, Either};
use futures_timer::Delay;

use crate::error::Error;
use crate::format::{CallSite, Class, Record};
use crate::level::Level;
use crate::rotor::RotatingFile;
use crate::sink::Dispatcher;
use crate::worker::panic_message;

/// The background rotation checker.
pub struct Monitor {
    handle: Option<JoinHandle<()>>,
    stop: Option<oneshot::Sender<()>>,
}

impl Monitor {
    /// Spawns the monitor thread ticking at `interval`.
    pub fn start(
        interval: Duration,
        rotor: Arc<RotatingFile>,
        dispatcher: Dispatcher,
    ) -> Result<Monitor, Error> {
        let (stop_sender, stop_receiver) = oneshot::channel();

        let handle = thread::Builder::new()
            .name("Rotation monitor".to_string())
            .spawn(move || {
                let mut pool = LocalPool::new();
                pool.run_until(Monitor::tick_loop(interval, stop_receiver, rotor, dispatcher));
            })?;

        Ok(Monitor {
            handle: Some(handle),
            stop: Some(stop_sender),
        })
    }

    /// Waits out the interval between checks, rotating when a day boundary
    /// was crossed, until the stop signal arrives (or its sender is gone).
    async fn tick_loop(
        interval: Duration,
        stop: oneshot::Receiver<()>,
        rotor: Arc<RotatingFile>,
        dispatcher: Dispatcher,
    ) {
        let mut stop = stop;
        loop {
            let tick = Delay::new(interval);
            match select(stop, tick).await {
                Either::Left(_) => break,
                Either::Right((_, pending_stop)) => {
                    stop = pending_stop;
                    if rotor.is_rotation_due() {
                        if let Err(err) = rotor.rotate() {
                            // Formatting needs no lock; only the queue push
                            // is synchronized, so reporting from here is safe.
                            let message = format!("Log rotate error: {err}");
                            dispatcher.dispatch(&Record {
                                class: Class::Leveled(Level::Error),
                                site: CallSite::caller(),
                                message: &message,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Signals the monitor to stop and waits for the thread to finish.
    pub fn stop(mut self) -> Result<(), Error> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle
            .join()
            .map_err(|payload| Error::TaskPanic(format!("monitor: {}", panic_message(&payload))))
    }
}
