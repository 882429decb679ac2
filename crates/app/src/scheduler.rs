//! Scheduler — the background loop that fires due tasks and runs the
//! security monitor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use homectl_domain::event::EventKind;
use homectl_domain::schedule::ScheduledTask;
use homectl_domain::time;

use crate::hub::Hub;
use crate::ports::{EventLog, PinDriver, StateStore};

/// Default pause between scheduler passes.
pub const DEFAULT_TICK: Duration = Duration::from_secs(2);
/// Default buzzer hold after a security alert.
pub const DEFAULT_ALERT_HOLD: Duration = Duration::from_secs(5);

/// Periodic executor for scheduled tasks and the security monitor.
pub struct Scheduler<D, S, L> {
    hub: Arc<Hub<D, S, L>>,
    tick: Duration,
    alert_hold: Duration,
}

impl<D, S, L> Scheduler<D, S, L>
where
    D: PinDriver + Send + Sync,
    S: StateStore + Clone + Send + Sync,
    L: EventLog + Send + Sync,
{
    pub fn new(hub: Arc<Hub<D, S, L>>, tick: Duration, alert_hold: Duration) -> Self {
        Self {
            hub,
            tick,
            alert_hold,
        }
    }

    /// Run until the shutdown signal flips. One pass per tick; a pass that
    /// overruns (alert hold) skips the missed ticks instead of bursting.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(tick = ?self.tick, "scheduler loop started");
        loop {
            tokio::select! {
                _ = interval.tick() => self.tick_once().await,
                _ = shutdown.changed() => {
                    tracing::info!("scheduler loop stopping");
                    return;
                }
            }
        }
    }

    /// One scheduler pass: fire every due task, then the monitor.
    pub async fn tick_once(&self) {
        self.run_due_tasks().await;
        self.hub.security_tick(self.alert_hold).await;
    }

    /// Remove and execute every task whose due time has passed. Each task
    /// fires at most once: a failed actuation is logged and the task is
    /// dropped, never re-queued. The surviving set is persisted once per
    /// pass when anything fired.
    async fn run_due_tasks(&self) {
        let now = time::now();
        let due = {
            let mut tasks = self.hub.tasks.lock();
            let (due, remaining): (Vec<ScheduledTask>, Vec<ScheduledTask>) =
                tasks.drain(..).partition(|task| task.is_due(now));
            *tasks = remaining;
            due
        };
        if due.is_empty() {
            return;
        }

        for task in due {
            match self
                .hub
                .apply_switch(task.device, task.action, &task.user_name, None)
                .await
            {
                Ok(notification) => {
                    self.hub
                        .center
                        .log_event(
                            EventKind::ScheduledTaskExecuted,
                            notification.clone(),
                            Some(&task.user_name),
                            None,
                        )
                        .await;
                    self.hub.center.notify(notification).await;
                }
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        device = task.device.slug(),
                        "failed to execute scheduled task"
                    );
                }
            }
        }

        // Snapshot after execution so tasks scheduled mid-pass survive.
        let snapshot = self.hub.tasks.lock().clone();
        if let Err(err) = self.hub.store.save_tasks(&snapshot).await {
            tracing::error!(error = %err, "failed to persist scheduled tasks");
        }
    }
}
