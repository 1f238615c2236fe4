//! Background SMS dispatch.
//!
//! Posting must not wait on a carrier. Messages go into a bounded channel and
//! a small pool of worker threads drains it into the wrapped gateway. A full
//! queue is reported to the caller rather than blocking it. Failed deliveries
//! are logged and counted; there is no retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender, TrySendError};
use tracing::{info, warn};

use super::{SmsGateway, SmsMessage};
use crate::config::DispatcherConfig;
use crate::error::{DispatchError, SmsError, VillageResult};

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// Fire-and-forget SMS queue backed by worker threads.
pub struct SmsDispatcher {
    tx: Option<Sender<SmsMessage>>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
    counters: Arc<Counters>,
}

impl SmsDispatcher {
    /// Starts the worker pool.
    ///
    /// # Errors
    ///
    /// Returns `VillageError::Dispatch` wrapping `DispatchError::Spawn` if a
    /// worker thread cannot be created.
    pub fn start<G>(gateway: G, config: &DispatcherConfig) -> VillageResult<Self>
    where
        G: SmsGateway + 'static,
    {
        let workers = config.workers.max(1);
        let queue_capacity = config.queue_capacity.max(1);
        let (tx, rx) = bounded::<SmsMessage>(queue_capacity);
        let gateway: Arc<dyn SmsGateway> = Arc::new(gateway);
        let counters = Arc::new(Counters::default());

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx = rx.clone();
            let gateway = Arc::clone(&gateway);
            let counters = Arc::clone(&counters);
            let handle = thread::Builder::new()
                .name(format!("village-sms-{idx}"))
                .spawn(move || {
                    while let Ok(message) = rx.recv() {
                        match gateway.send(&message) {
                            Ok(()) => {
                                counters.delivered.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(err) => {
                                counters.failed.fetch_add(1, Ordering::Relaxed);
                                warn!(to = %message.to, error = %err, "sms delivery failed");
                            }
                        }
                    }
                })
                .map_err(|e| DispatchError::Spawn {
                    message: e.to_string(),
                })?;
            handles.push(handle);
        }

        info!(workers, queue_capacity, "sms dispatcher started");
        Ok(Self {
            tx: Some(tx),
            workers: handles,
            queue_capacity,
            counters,
        })
    }

    /// Queues a message without blocking.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::QueueFull` under backpressure and
    /// `DispatchError::Disconnected` once the dispatcher is shutting down.
    pub fn try_dispatch(&self, message: SmsMessage) -> Result<(), DispatchError> {
        let tx = self.tx.as_ref().ok_or(DispatchError::Disconnected)?;
        match tx.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DispatchError::QueueFull {
                capacity: self.queue_capacity,
            }),
            Err(TrySendError::Disconnected(_)) => Err(DispatchError::Disconnected),
        }
    }

    /// Number of messages waiting for a worker.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tx.as_ref().map_or(0, Sender::len)
    }

    /// Messages the gateway accepted.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.counters.delivered.load(Ordering::Relaxed)
    }

    /// Messages the gateway refused.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    /// Closes the queue, lets workers drain it, and joins them.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Dropping the sender ends each worker's `recv` loop once the queue is empty.
        if self.tx.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("sms-worker").to_string();
            if handle.join().is_err() {
                warn!(worker = %name, "sms worker panicked");
            }
        }
        info!(
            delivered = self.delivered(),
            failed = self.failed(),
            "sms dispatcher stopped"
        );
    }
}

impl SmsGateway for SmsDispatcher {
    fn send(&self, message: &SmsMessage) -> Result<(), SmsError> {
        self.try_dispatch(message.clone()).map_err(SmsError::from)
    }
}

impl Drop for SmsDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
