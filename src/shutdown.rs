// src/shutdown.rs

//! Subscriber accounting across all watched streams.
//!
//! The driver builds one [`ShutdownCoordinator`] and hands it to every
//! stream attachment. Each attached subscriber holds an [`Attachment`];
//! when the last one detaches the coordinator reports idle and the driver
//! decides what to do. Nothing here terminates the process.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

/// Result of detaching a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detach {
    /// This was the final active subscriber.
    Last,
    /// Other subscribers are still attached.
    Remaining(usize),
}

impl Detach {
    pub fn is_last(&self) -> bool {
        matches!(self, Detach::Last)
    }
}

struct Inner {
    active: Mutex<usize>,
    idle_tx: watch::Sender<bool>,
}

/// Shared counter of active subscribers plus an idle signal.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    inner: Arc<Inner>,
}

impl fmt::Debug for ShutdownCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownCoordinator")
            .field("active", &self.active())
            .finish()
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (idle_tx, _idle_rx) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                active: Mutex::new(0),
                idle_tx,
            }),
        }
    }

    /// Register a new subscriber.
    pub fn attach(&self) -> Attachment {
        let mut active = self.lock();
        *active += 1;
        self.inner.idle_tx.send_replace(false);
        debug!(active = *active, "subscriber attached");

        Attachment {
            coordinator: self.clone(),
            detached: false,
        }
    }

    /// Number of subscribers currently attached.
    pub fn active(&self) -> usize {
        *self.lock()
    }

    /// True once at least one subscriber attached and all have detached.
    pub fn is_idle(&self) -> bool {
        *self.inner.idle_tx.borrow()
    }

    /// Resolve once the last attached subscriber detaches.
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.idle_tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|idle| *idle).await;
    }

    fn release(&self) -> Detach {
        let mut active = self.lock();
        *active = active.saturating_sub(1);
        debug!(active = *active, "subscriber detached");

        if *active == 0 {
            self.inner.idle_tx.send_replace(true);
            Detach::Last
        } else {
            Detach::Remaining(*active)
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, usize> {
        // A poisoned counter is still a valid count.
        self.inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One subscriber's registration with the coordinator.
///
/// Detaches on drop if [`Attachment::detach`] was never called.
pub struct Attachment {
    coordinator: ShutdownCoordinator,
    detached: bool,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("detached", &self.detached)
            .finish()
    }
}

impl Attachment {
    pub fn detach(mut self) -> Detach {
        self.detached = true;
        self.coordinator.release()
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        if !self.detached {
            self.coordinator.release();
        }
    }
}
