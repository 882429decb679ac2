//! Hub — the single owned server state shared by request handlers and the
//! background loops.
//!
//! All mutable collections live here behind their own locks: the device
//! registry, the pending task set, the chat registry, and the notification
//! center. The command interpreter (`interpreter` module), the security
//! monitor (`monitor` module), and the scheduler all mutate devices through
//! [`Hub::apply_switch`], the one actuation path.

use std::collections::HashSet;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use homectl_domain::appliance::{ApplianceKind, SwitchState};
use homectl_domain::error::ActuationError;
use homectl_domain::event::EventKind;
use homectl_domain::pin::{PinAssignments, PinLevel};
use homectl_domain::schedule::ScheduledTask;
use homectl_domain::time::{self, Timestamp, format_clock};

use crate::actuator::RetryingDriver;
use crate::notifier::NotificationCenter;
use crate::ports::{EventLog, PinDriver, StateStore};
use crate::registry::{DeviceRegistry, StatusSnapshot};

/// Messages longer than this are truncated at the processing boundary.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Result of processing one inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedMessage {
    pub response: String,
    pub user_name: String,
    pub user_id: i64,
}

/// Liveness counters exposed by the health boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSnapshot {
    pub uptime_secs: i64,
    pub messages_processed: u64,
    pub avg_processing_time: f64,
}

#[derive(Default)]
struct Stats {
    messages: u64,
    total: std::time::Duration,
}

/// Central application state. One instance per process, shared via `Arc`.
pub struct Hub<D, S, L> {
    pub(crate) actuator: RetryingDriver<D>,
    pub(crate) registry: DeviceRegistry,
    pub(crate) tasks: Mutex<Vec<ScheduledTask>>,
    pub(crate) center: NotificationCenter<S, L>,
    pub(crate) store: S,
    chats: Mutex<HashSet<i64>>,
    stats: Mutex<Stats>,
    started_at: Timestamp,
}

impl<D, S, L> Hub<D, S, L>
where
    D: PinDriver + Send + Sync,
    S: StateStore + Clone + Send + Sync,
    L: EventLog + Send + Sync,
{
    /// Build the hub, loading all persisted collections. Load failures
    /// recover to empty defaults; startup never fails on bad state files.
    ///
    /// Returns the receiving end of the notification delivery queue.
    pub async fn load(
        actuator: RetryingDriver<D>,
        store: S,
        log: L,
        pins: PinAssignments,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let chats = store.load_chat_ids().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load chat registry, starting empty");
            HashSet::new()
        });
        let tasks = store.load_tasks().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load scheduled tasks, starting empty");
            Vec::new()
        });
        let notifications = store.load_notifications().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load pending notifications, starting empty");
            Vec::new()
        });
        let (center, delivery_rx) = NotificationCenter::new(store.clone(), log, notifications);

        let hub = Self {
            actuator,
            registry: DeviceRegistry::new(&pins),
            tasks: Mutex::new(tasks),
            center,
            store,
            chats: Mutex::new(chats),
            stats: Mutex::new(Stats::default()),
            started_at: time::now(),
        };
        (hub, delivery_rx)
    }

    /// Processing boundary for inbound commands.
    ///
    /// Oversized messages are truncated with an ellipsis, never rejected.
    /// The caller identity is registered for future push broadcast, the
    /// command is interpreted, and any resulting notification is recorded.
    #[tracing::instrument(skip(self, message), fields(user_name = %user_name, user_id))]
    pub async fn process_message(
        &self,
        message: &str,
        user_name: &str,
        user_id: i64,
    ) -> ProcessedMessage {
        let started = Instant::now();
        let message = truncate_message(message);
        self.register_chat(user_id, user_name).await;

        let outcome = self.interpret(&message, user_name, user_id).await;
        if let Some(notification) = outcome.notification {
            self.center.notify(notification).await;
        }

        {
            let mut stats = self.stats.lock();
            stats.messages += 1;
            stats.total += started.elapsed();
        }
        tracing::info!(reply = %outcome.reply, "processed message");

        ProcessedMessage {
            response: outcome.reply,
            user_name: user_name.to_string(),
            user_id,
        }
    }

    /// The single device-mutation path, shared by the interpreter and the
    /// scheduler.
    ///
    /// Actuates the appliance's pin (with retries), records the new state
    /// only on success, logs a `device_control` event, and returns the
    /// notification text for the transition.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError`] when the pin did not respond after all
    /// attempts; the registry is left unchanged in that case.
    pub async fn apply_switch(
        &self,
        kind: ApplianceKind,
        action: SwitchState,
        actor: &str,
        actor_id: Option<i64>,
    ) -> Result<String, ActuationError> {
        let pin = self.registry.pin_of(kind);
        self.actuator.set_pin(pin, action.level()).await?;
        self.registry.set_state(kind, action);

        self.center
            .log_event(
                EventKind::DeviceControl,
                format!("{} turned {}", kind.display_name(), action.label()),
                Some(actor),
                actor_id,
            )
            .await;

        Ok(format!(
            "[NOTIFICATION] 🔔 {actor}: {} turned {} at {}",
            kind.display_name(),
            action.label(),
            format_clock(time::now())
        ))
    }

    /// Arm the security subsystem: laser on, buzzer off, sensor checked.
    /// Re-arming an already-active system is legal and re-actuates every
    /// module.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError`] when any module did not respond; the
    /// subsystem is not marked active in that case.
    pub async fn initialize_security(
        &self,
        actor: &str,
        actor_id: Option<i64>,
    ) -> Result<String, ActuationError> {
        let security = self.registry.security();
        self.actuator.set_pin(security.laser_pin, PinLevel::High).await?;
        self.actuator.set_pin(security.buzzer_pin, PinLevel::Low).await?;
        self.actuator.read_pin(security.sensor_pin).await?;
        self.registry.set_security_active(true);

        self.center
            .log_event(
                EventKind::SecuritySystemActivated,
                format!("Home security system activated by {actor}"),
                Some(actor),
                actor_id,
            )
            .await;

        Ok(format!(
            "[NOTIFICATION] 🛡️ {actor}: Home Security System INITIALIZED at {}",
            format_clock(time::now())
        ))
    }

    /// Disarm the security subsystem: laser and buzzer off.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError`] when any module did not respond; the
    /// subsystem stays in its previous state in that case.
    pub async fn terminate_security(
        &self,
        actor: &str,
        actor_id: Option<i64>,
    ) -> Result<String, ActuationError> {
        let security = self.registry.security();
        self.actuator.set_pin(security.laser_pin, PinLevel::Low).await?;
        self.actuator.set_pin(security.buzzer_pin, PinLevel::Low).await?;
        self.registry.set_security_active(false);

        self.center
            .log_event(
                EventKind::SecuritySystemDeactivated,
                format!("Home security system deactivated by {actor}"),
                Some(actor),
                actor_id,
            )
            .await;

        Ok(format!(
            "[NOTIFICATION] 🛡️ {actor}: Home Security System TERMINATED at {}",
            format_clock(time::now())
        ))
    }

    /// Non-destructive snapshot of the pending notifications.
    #[must_use]
    pub fn pending_notifications(&self) -> Vec<homectl_domain::notification::PendingNotification> {
        self.center.pending()
    }

    /// Most recent `limit` event-log entries, in insertion order.
    pub async fn recent_events(
        &self,
        limit: usize,
    ) -> Vec<homectl_domain::event::EventLogEntry> {
        self.center.recent_events(limit).await
    }

    /// Point-in-time view of all device state.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        self.registry.snapshot()
    }

    /// Liveness counters for the health boundary.
    #[must_use]
    pub fn health_snapshot(&self) -> HealthSnapshot {
        let stats = self.stats.lock();
        #[allow(clippy::cast_precision_loss)]
        let avg = if stats.messages == 0 {
            0.0
        } else {
            stats.total.as_secs_f64() / stats.messages as f64
        };
        HealthSnapshot {
            uptime_secs: (time::now() - self.started_at).num_seconds(),
            messages_processed: stats.messages,
            avg_processing_time: avg,
        }
    }

    async fn register_chat(&self, user_id: i64, user_name: &str) {
        let snapshot = {
            let mut chats = self.chats.lock();
            if chats.insert(user_id) {
                Some(chats.clone())
            } else {
                None
            }
        };
        let Some(snapshot) = snapshot else { return };

        if let Err(err) = self.store.save_chat_ids(&snapshot).await {
            tracing::error!(error = %err, "failed to persist chat registry");
        }
        self.center
            .log_event(
                EventKind::UserJoined,
                format!("{user_name} registered for notifications"),
                Some(user_name),
                Some(user_id),
            )
            .await;
    }
}

/// Truncate a message to the boundary limit, appending an ellipsis.
#[must_use]
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
    truncated.push_str("...");
    truncated
}
