//! Cancellable one-shot timers delivering events to a single owner.
//!
//! Each scheduled timer is a spawned task sleeping until its deadline. The
//! owning [`TimerHandle`] aborts that task when dropped, so cancelling a
//! timer is just removing its handle. Fired timers report through a channel
//! owned by the [`Timers`] set; an event whose timer is no longer pending
//! (cancelled after it fired but before it was observed) is discarded.
//!
//! Scheduling spawns onto the current tokio runtime.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Identifier of a scheduled timer, unique for the lifetime of a [`Timers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Owned handle to a sleeping timer task. Aborts the task on drop.
struct TimerHandle(JoinHandle<()>);

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// A set of pending timers, each carrying an event of type `E`.
pub struct Timers<E> {
    tx: mpsc::UnboundedSender<(TimerId, E)>,
    rx: mpsc::UnboundedReceiver<(TimerId, E)>,
    pending: HashMap<TimerId, TimerHandle>,
    next_id: u64,
}

impl<E> fmt::Debug for Timers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("pending", &self.pending.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<E: Send + 'static> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + 'static> Timers<E> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to fire at `deadline`.
    pub fn schedule_at(&mut self, deadline: Instant, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // The receiver lives as long as the set; a send error only means
            // the set was dropped, and then nobody wants the event.
            let _ = tx.send((id, event));
        });
        self.pending.insert(id, TimerHandle(task));
        id
    }

    /// Schedule `event` to fire after `delay` from now.
    pub fn schedule_after(&mut self, delay: Duration, event: E) -> TimerId {
        self.schedule_at(Instant::now() + delay, event)
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Cancel every pending timer and discard anything already fired.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "Cancelling pending timers");
        }
        self.pending.clear();
        while self.rx.try_recv().is_ok() {}
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for the next timer to fire and return its event.
    ///
    /// Returns `None` immediately when nothing is pending. Cancel-safe.
    pub async fn next(&mut self) -> Option<E> {
        while !self.pending.is_empty() {
            let (id, event) = self.rx.recv().await?;
            if self.pending.remove(&id).is_some() {
                return Some(event);
            }
            tracing::trace!(?id, "Discarding event from cancelled timer");
        }
        None
    }
}
