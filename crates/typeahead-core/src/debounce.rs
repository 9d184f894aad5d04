//! Single-slot deferred tasks for coalescing bursts of events.
//!
//! A [`DebounceLine`] owns at most one pending timer. Scheduling a new one
//! aborts its predecessor first, so a burst of keystrokes (or resize events)
//! collapses into a single delayed message. Every fire carries the generation
//! it was armed with; [`DebounceLine::fire`] rejects anything but the most
//! recent one, which also covers a timer that completed and queued its message
//! just before being cancelled.

use crate::command::Command;
use futures::future::{AbortHandle, Abortable};
use futures::StreamExt;
use std::time::Duration;

/// One coalescing, cancel-and-reschedule timer slot.
#[derive(Debug)]
pub struct DebounceLine {
    name: &'static str,
    delay: Duration,
    generation: u64,
    pending: Option<AbortHandle>,
}

impl DebounceLine {
    /// Create an idle line with the given name (used in logs) and delay.
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// The delay applied to newly scheduled timers.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A timer already pending keeps its original deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Whether a timer is currently armed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Generation of the most recently armed timer.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel any pending timer and arm a new one.
    ///
    /// The returned command yields `to_msg(generation)` once the delay elapses,
    /// or nothing at all if the timer is cancelled first. Pass the generation
    /// back to [`fire`](Self::fire) when the message arrives.
    pub fn schedule<Msg: Send + 'static>(
        &mut self,
        to_msg: impl FnOnce(u64) -> Msg + Send + 'static,
    ) -> Command<Msg> {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let (handle, registration) = AbortHandle::new_pair();
        self.pending = Some(handle);
        tracing::trace!(line = self.name, generation, delay = ?self.delay, "debounce armed");

        let delay = self.delay;
        let fired = async move {
            let timer = Abortable::new(tokio::time::sleep(delay), registration);
            timer.await.ok().map(|()| to_msg(generation))
        };
        Command::stream(futures::stream::once(fired).filter_map(futures::future::ready))
    }

    /// Accept a fired timer. Returns `true` only for the latest armed
    /// generation, and only once.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            tracing::trace!(line = self.name, generation, "debounce fired");
            true
        } else {
            tracing::trace!(line = self.name, generation, latest = self.generation, "stale debounce discarded");
            false
        }
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            tracing::trace!(line = self.name, generation = self.generation, "debounce cancelled");
        }
    }
}

impl Drop for DebounceLine {
    fn drop(&mut self) {
        self.cancel();
    }
}
