use std::future::Future;
use std::pin::Pin;

use tokio::sync::{mpsc, oneshot};
use streammon::source::Ticker;

/// A ticker driven by hand.
///
/// Each `tick()` waits for one message from the paired [`TickHandle`];
/// dropping every handle exhausts the ticker and stops the source using it.
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<oneshot::Sender<()>>,
}

/// Sender side of a [`ManualTicker`].
#[derive(Clone)]
pub struct TickHandle {
    tx: mpsc::UnboundedSender<oneshot::Sender<()>>,
}

impl TickHandle {
    /// Deliver one tick and wait until the source has taken it.
    ///
    /// A source only asks for a tick once it finished the previous poll, so
    /// when this returns the earlier poll is complete. Returns immediately if
    /// the source has already stopped.
    pub async fn tick(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(ack_tx).is_ok() {
            let _ = ack_rx.await;
        }
    }
}

pub fn manual_ticker() -> (ManualTicker, TickHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualTicker { rx }, TickHandle { tx })
}

impl Ticker for ManualTicker {
    fn tick(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            match self.rx.recv().await {
                Some(ack) => {
                    let _ = ack.send(());
                    true
                }
                None => false,
            }
        })
    }
}
