//! Delivery loop — drains the notification queue toward the broadcast
//! capability.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use homectl_domain::error::DeliveryError;

use crate::ports::Broadcaster;

/// Default pause between delivery passes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
/// Consecutive failures tolerated before the counter resets.
const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// Broadcast capability that only records the notification. Stands in
/// until an outward push channel is wired up; pull clients read the
/// pending list over HTTP either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBroadcaster;

impl Broadcaster for TracingBroadcaster {
    async fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        tracing::info!(%text, "broadcast notification");
        Ok(())
    }
}

/// Drains queued notifications on a fixed interval.
///
/// The loop never exits under sustained failure: after ten consecutive
/// delivery errors the counter resets and draining continues.
pub struct DeliveryLoop<B> {
    queue: mpsc::UnboundedReceiver<String>,
    broadcaster: B,
    interval: Duration,
    consecutive_failures: u32,
}

impl<B: Broadcaster + Send + Sync> DeliveryLoop<B> {
    pub fn new(queue: mpsc::UnboundedReceiver<String>, broadcaster: B, interval: Duration) -> Self {
        Self {
            queue,
            broadcaster,
            interval,
            consecutive_failures: 0,
        }
    }

    /// Run until the shutdown signal flips.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval = ?self.interval, "delivery loop started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.drain_once().await;
                }
                _ = shutdown.changed() => {
                    tracing::info!("delivery loop stopping");
                    return;
                }
            }
        }
    }

    /// Deliver everything currently queued. Returns the number of
    /// successful deliveries.
    pub async fn drain_once(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(text) = self.queue.try_recv() {
            match self.broadcaster.deliver(&text).await {
                Ok(()) => {
                    delivered += 1;
                    self.consecutive_failures = 0;
                }
                Err(err) => {
                    self.consecutive_failures += 1;
                    tracing::error!(
                        error = %err,
                        consecutive = self.consecutive_failures,
                        "notification delivery failed"
                    );
                    if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        tracing::warn!(
                            "too many consecutive delivery failures, resetting counter"
                        );
                        self.consecutive_failures = 0;
                    }
                }
            }
        }
        delivered
    }
}
