//! Background notification delivery.
//!
//! Spawns a thread that owns the `Notifier` and drains a bounded channel.
//! Submitting never blocks the sampling loop: when the queue is full the
//! message is dropped and counted. Delivery errors are logged here and go
//! nowhere else; nothing is retried.
//!
//! Each `Dispatcher` owns exactly one thread. Dropping it closes the queue,
//! lets the thread deliver what is already queued, then joins it.
use crossbeam_channel as xch;
use gatekeeper_traits::{BoxError, Notifier};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::hw_error::map_notify_error;
use crate::message::Outgoing;

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Snapshot of delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

pub struct Dispatcher {
    tx: Option<xch::Sender<Outgoing>>,
    counters: Arc<Counters>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Dispatcher {
    pub fn spawn<N: Notifier + Send + 'static>(mut notifier: N, queue_depth: usize) -> Self {
        let (tx, rx) = xch::bounded::<Outgoing>(queue_depth.max(1));
        let counters = Arc::new(Counters::default());
        let counters_bg = counters.clone();

        let join_handle = std::thread::Builder::new()
            .name("gatekeeper-notify".into())
            .spawn(move || {
                // Ends once every sender is gone and the queue is empty.
                for msg in rx.iter() {
                    match notifier.send(&msg.recipient, &msg.text) {
                        Ok(()) => {
                            counters_bg.delivered.fetch_add(1, Ordering::Relaxed);
                            tracing::debug!(recipient = %msg.recipient, "notification delivered");
                        }
                        Err(e) => {
                            counters_bg.failed.fetch_add(1, Ordering::Relaxed);
                            let err = map_notify_error(e.as_ref());
                            tracing::warn!(recipient = %msg.recipient, error = %err, "notification dropped");
                        }
                    }
                }
                tracing::trace!("dispatch thread exiting cleanly");
            });

        let join_handle = match join_handle {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn dispatch thread; notifications disabled");
                None
            }
        };

        Self {
            tx: join_handle.as_ref().map(|_| tx),
            counters,
            join_handle,
        }
    }

    /// Queue a message. Returns false if it was dropped.
    pub fn submit(&self, msg: Outgoing) -> bool {
        let Some(tx) = self.tx.as_ref() else {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        };
        match tx.try_send(msg) {
            Ok(()) => true,
            Err(xch::TrySendError::Full(m)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(recipient = %m.recipient, "notification queue full, message dropped");
                false
            }
            Err(xch::TrySendError::Disconnected(m)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(recipient = %m.recipient, "dispatch thread gone, message dropped");
                false
            }
        }
    }

    /// Queue several messages; returns how many were accepted.
    pub fn submit_all(&self, msgs: impl IntoIterator<Item = Outgoing>) -> usize {
        msgs.into_iter().map(|m| self.submit(m)).filter(|ok| *ok).count()
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    /// Close the queue, wait for pending deliveries, return final counters.
    pub fn shutdown(mut self) -> DispatchStats {
        self.close_and_join();
        self.stats()
    }

    fn close_and_join(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("dispatch thread joined"),
                Err(e) => tracing::warn!(?e, "dispatch thread panicked during shutdown"),
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

/// Notifier that only logs. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&mut self, recipient: &str, text: &str) -> Result<(), BoxError> {
        tracing::info!(recipient, text, "notification (dry run)");
        Ok(())
    }
}
