// src/channel/mod.rs

//! Line delivery between a stream's source and its consumers.
//!
//! A [`LineChannel`] fans every published line out to all attached
//! subscribers. Each subscriber owns a bounded queue, so a slow consumer
//! makes the publisher wait rather than drop lines.
//!
//! - [`Publisher`] is held by the line source task.
//! - [`Subscriber`] is held by a consumer loop and carries its
//!   [`Attachment`] to the shutdown coordinator.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::trace;

use crate::errors::{Result, StreammonError};
use crate::shutdown::{Attachment, Detach, ShutdownCoordinator};

/// Per-subscriber queue capacity.
pub const SUBSCRIBER_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct ChannelState {
    closed: bool,
    senders: Vec<mpsc::Sender<String>>,
}

/// The single delivery channel owned by a stream.
#[derive(Clone, Default)]
pub struct LineChannel {
    state: Arc<Mutex<ChannelState>>,
}

impl fmt::Debug for LineChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("LineChannel")
            .field("closed", &state.closed)
            .field("subscribers", &state.senders.len())
            .finish()
    }
}

impl LineChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber queue and count it with `coordinator`.
    ///
    /// Subscribing to an already closed channel yields a subscriber that
    /// immediately sees end-of-sequence.
    pub fn subscribe(&self, coordinator: &ShutdownCoordinator) -> Subscriber {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        {
            let mut state = self.lock();
            if !state.closed {
                state.senders.push(tx);
            }
        }

        Subscriber {
            rx,
            attachment: coordinator.attach(),
        }
    }

    pub fn publisher(&self) -> Publisher {
        Publisher {
            channel: self.clone(),
        }
    }

    /// Close the channel for publishing.
    ///
    /// Dropping the senders wakes every receiver; lines already queued are
    /// still delivered before end-of-sequence.
    pub fn close(&self) {
        let mut state = self.lock();
        if !state.closed {
            state.closed = true;
            state.senders.clear();
            trace!("line channel closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().senders.len()
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Producer end of a [`LineChannel`].
#[derive(Clone)]
pub struct Publisher {
    channel: LineChannel,
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("channel", &self.channel)
            .finish()
    }
}

impl Publisher {
    /// Deliver `line` to every live subscriber, waiting for queue capacity.
    ///
    /// Returns the number of subscribers that received the line, or
    /// [`StreammonError::ChannelClosed`] if the channel was closed.
    pub async fn publish(&self, line: impl Into<String>) -> Result<usize> {
        let line = line.into();
        let senders = {
            let state = self.channel.lock();
            if state.closed {
                return Err(StreammonError::ChannelClosed);
            }
            state.senders.clone()
        };

        let mut delivered = 0;
        let mut saw_dropped = false;
        for tx in &senders {
            match tx.send(line.clone()).await {
                Ok(()) => delivered += 1,
                Err(_) => saw_dropped = true,
            }
        }

        if saw_dropped {
            self.channel.lock().senders.retain(|tx| !tx.is_closed());
        }

        Ok(delivered)
    }

    /// `Some(ChannelClosed)` once the channel has been closed.
    pub fn err(&self) -> Option<StreammonError> {
        self.is_closed().then_some(StreammonError::ChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }

    pub fn close(&self) {
        self.channel.close();
    }
}

/// Consumer end of a [`LineChannel`].
pub struct Subscriber {
    rx: mpsc::Receiver<String>,
    attachment: Attachment,
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("attachment", &self.attachment)
            .finish_non_exhaustive()
    }
}

impl Subscriber {
    /// Wait for the next line; `None` once the channel is closed and drained.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Stop receiving and release this subscriber's registration.
    pub fn detach(self) -> Detach {
        let Subscriber { mut rx, attachment } = self;
        rx.close();
        attachment.detach()
    }
}
