//! Debounced write-back
//!
//! A background thread receives values over a channel and hands the latest
//! one to a sink once the window has passed without a newer submission.
//! Dropping the debouncer discards whatever is still pending and joins the
//! thread, so the sink never runs after teardown.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{PlannerError, PlannerResult};

enum Message<T> {
    Submit(T),
    Flush(mpsc::Sender<PlannerResult<()>>),
    Cancel,
    Shutdown,
}

type LastError = Arc<Mutex<Option<PlannerError>>>;

/// Latest-value-wins debouncer backed by a worker thread
pub struct Debouncer<T: Send + 'static> {
    sender: mpsc::Sender<Message<T>>,
    handle: Option<thread::JoinHandle<()>>,
    last_error: LastError,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start a worker that calls `sink` once `window` passes quietly
    pub fn new<F>(window: Duration, sink: F) -> Self
    where
        F: FnMut(T) -> PlannerResult<()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let last_error: LastError = Arc::new(Mutex::new(None));

        let handle = {
            let last_error = Arc::clone(&last_error);
            thread::spawn(move || run_worker(receiver, window, sink, last_error))
        };

        Self {
            sender,
            handle: Some(handle),
            last_error,
        }
    }

    /// Replace the pending value and restart the window
    pub fn submit(&self, value: T) {
        if self.sender.send(Message::Submit(value)).is_err() {
            tracing::warn!("debounce worker is gone; dropping submitted value");
        }
    }

    /// Write the pending value now and wait for the sink to finish
    pub fn flush(&self) -> PlannerResult<()> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.sender
            .send(Message::Flush(ack_tx))
            .map_err(|_| PlannerError::Storage("debounce worker is not running".into()))?;
        ack_rx
            .recv()
            .map_err(|_| PlannerError::Storage("debounce worker stopped during flush".into()))?
    }

    /// Discard the pending value without writing it
    pub fn cancel(&self) {
        let _ = self.sender.send(Message::Cancel);
    }

    /// Most recent error from a timed write, cleared on read
    pub fn take_last_error(&self) -> Option<PlannerError> {
        self.last_error.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let _ = self.sender.send(Message::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("debounce worker panicked");
            }
        }
    }
}

fn run_worker<T, F>(
    receiver: mpsc::Receiver<Message<T>>,
    window: Duration,
    mut sink: F,
    last_error: LastError,
) where
    F: FnMut(T) -> PlannerResult<()>,
{
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let message = match deadline {
            Some(at) => match receiver.recv_timeout(at.saturating_duration_since(Instant::now())) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => {
                    deadline = None;
                    if let Some(value) = pending.take() {
                        if let Err(e) = sink(value) {
                            tracing::error!(error = %e, "debounced write failed");
                            if let Ok(mut slot) = last_error.lock() {
                                *slot = Some(e);
                            }
                        }
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match receiver.recv() {
                Ok(message) => message,
                Err(_) => break,
            },
        };

        match message {
            Message::Submit(value) => {
                pending = Some(value);
                deadline = Some(Instant::now() + window);
            }
            Message::Flush(ack) => {
                deadline = None;
                let result = match pending.take() {
                    Some(value) => {
                        tracing::debug!("flushing pending write");
                        sink(value)
                    }
                    None => Ok(()),
                };
                if let Err(e) = &result {
                    tracing::error!(error = %e, "flushed write failed");
                }
                let _ = ack.send(result);
            }
            Message::Cancel => {
                deadline = None;
                if pending.take().is_some() {
                    tracing::debug!("discarded pending write");
                }
            }
            Message::Shutdown => break,
        }
    }

    if pending.is_some() {
        tracing::debug!("debouncer dropped with a pending write; discarding it");
    }
}
