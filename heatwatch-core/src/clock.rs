use std::time::Duration;

use anyhow::{Result, ensure};
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Fixed-cadence tick source for the polling loop. The first tick is
/// immediate, subsequent ones come after the given period. Under tokio's
/// paused test clock this runs without real sleeps.
#[derive(Debug)]
pub struct Ticker {
    inner: Interval,
}

impl Ticker {
    /// The period must be non-zero; tokio's interval cannot represent an
    /// always-ready tick.
    pub fn new(period: Duration) -> Result<Self> {
        ensure!(!period.is_zero(), "tick period must be non-zero");
        let mut inner = interval(period);
        // A slow cycle should not cause a burst of catch-up ticks.
        inner.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Ok(Self { inner })
    }

    pub async fn tick(&mut self) {
        self.inner.tick().await;
    }
}
