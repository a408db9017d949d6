// src/source/ticker.rs

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

/// Clock driving file polls.
///
/// `tick` resolves when the next poll is due. Returning `false` means the
/// ticker is exhausted and the source should stop.
pub trait Ticker: Send + 'static {
    fn tick(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Fixed-interval ticker backed by `tokio::time::interval`.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        // `interval` panics on a zero period.
        let period = period.max(Duration::from_millis(1));
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Ticker for IntervalTicker {
    fn tick(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            self.interval.tick().await;
            true
        })
    }
}
