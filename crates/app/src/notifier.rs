//! Notification center — the durable pending list, the event log, and the
//! internal delivery queue.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use homectl_domain::event::{EventKind, EventLogEntry};
use homectl_domain::notification::{PENDING_CAP, PendingNotification};
use homectl_domain::time::{self, format_log};

use crate::ports::{EventLog, StateStore};

/// Number of entries shown by the rendered log view.
const RENDERED_ENTRIES: usize = 20;

/// Bounded pending-notification list plus the append-only event log.
///
/// The pending list is pull-consumed: polling clients all observe the same
/// set until new notifications arrive or the cap evicts old ones. There is
/// no per-client cursor. Every notification is also pushed onto an
/// internal queue drained by the delivery loop.
pub struct NotificationCenter<S, L> {
    store: S,
    log: L,
    pending: Mutex<Vec<PendingNotification>>,
    queue: mpsc::UnboundedSender<String>,
}

impl<S, L> NotificationCenter<S, L>
where
    S: StateStore + Send + Sync,
    L: EventLog + Send + Sync,
{
    /// Create the center seeded with previously persisted notifications.
    ///
    /// Returns the receiving end of the delivery queue, to be handed to
    /// the delivery loop.
    pub fn new(
        store: S,
        log: L,
        initial: Vec<PendingNotification>,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (queue, rx) = mpsc::unbounded_channel();
        (
            Self {
                store,
                log,
                pending: Mutex::new(initial),
                queue,
            },
            rx,
        )
    }

    /// Record a notification: append to the pending list, evict past the
    /// cap (oldest-first by insertion order), persist, and enqueue for
    /// push delivery.
    pub async fn notify(&self, text: impl Into<String>) {
        let text = text.into();
        let notification = PendingNotification::new(text.clone(), time::now());
        let snapshot = {
            let mut pending = self.pending.lock();
            pending.push(notification);
            if pending.len() > PENDING_CAP {
                let excess = pending.len() - PENDING_CAP;
                pending.drain(..excess);
            }
            pending.clone()
        };
        if let Err(err) = self.store.save_notifications(&snapshot).await {
            tracing::error!(error = %err, "failed to persist pending notifications");
        }
        // The delivery loop may already be gone during shutdown.
        let _ = self.queue.send(text.clone());
        tracing::info!(total = snapshot.len(), %text, "added pending notification");
    }

    /// Non-destructive snapshot of the pending list. Idempotent between
    /// inserts.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingNotification> {
        self.pending.lock().clone()
    }

    /// Append one record to the event log. A write failure is reported,
    /// never propagated to the caller.
    pub async fn log_event(
        &self,
        kind: EventKind,
        message: impl Into<String>,
        user_name: Option<&str>,
        user_id: Option<i64>,
    ) {
        let entry = EventLogEntry::new(
            time::now(),
            kind,
            message,
            user_name.map(str::to_string),
            user_id,
        );
        if let Err(err) = self.log.append(&entry).await {
            tracing::error!(error = %err, event = %kind, "failed to append event log entry");
        }
    }

    /// Most recent `limit` entries, in stored (insertion) order.
    pub async fn recent_events(&self, limit: usize) -> Vec<EventLogEntry> {
        match self.log.read_all().await {
            Ok(entries) => {
                let skip = entries.len().saturating_sub(limit);
                entries.into_iter().skip(skip).collect()
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to read event log");
                Vec::new()
            }
        }
    }

    /// Render the event log for the `log details` command: newest first,
    /// at most twenty entries, with ordinal, local timestamp, type, actor,
    /// and message.
    pub async fn render_log_details(&self) -> String {
        let mut entries = match self.log.read_all().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(error = %err, "failed to read event log");
                return "Error retrieving log details. Please try again.".to_string();
            }
        };
        if entries.is_empty() {
            return "No log entries found.".to_string();
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut lines = vec![
            "=".repeat(60),
            "DETAILED SERVER LOGS".to_string(),
            "=".repeat(60),
            format!("Total Events: {}", entries.len()),
            String::new(),
        ];
        for (position, entry) in entries.iter().take(RENDERED_ENTRIES).enumerate() {
            let user_name = entry.user_name.as_deref().unwrap_or("Unknown");
            let user_id = entry
                .user_id
                .map_or_else(|| "Unknown".to_string(), |id| id.to_string());
            lines.push(format!("[{:2}] {}", position + 1, format_log(entry.timestamp)));
            lines.push(format!("     Type: {}", entry.event_type));
            lines.push(format!("     User: {user_name} (ID: {user_id})"));
            lines.push(format!("     Message: {}", entry.message));
            lines.push(String::new());
        }
        lines.push("=".repeat(60));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MemoryLog, MemoryStore};

    fn center() -> (
        NotificationCenter<MemoryStore, MemoryLog>,
        MemoryStore,
        MemoryLog,
        mpsc::UnboundedReceiver<String>,
    ) {
        let store = MemoryStore::default();
        let log = MemoryLog::default();
        let (center, rx) = NotificationCenter::new(store.clone(), log.clone(), Vec::new());
        (center, store, log, rx)
    }

    #[tokio::test]
    async fn should_append_persist_and_enqueue_notifications() {
        let (center, store, _, mut rx) = center();

        center.notify("Light turned ON").await;

        let pending = center.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].text, "Light turned ON");
        assert_eq!(store.notifications().len(), 1);
        assert_eq!(rx.try_recv().unwrap(), "Light turned ON");
    }

    #[tokio::test]
    async fn should_cap_pending_list_at_one_hundred() {
        let (center, store, _, _rx) = center();

        for i in 0..101 {
            center.notify(format!("notification {i}")).await;
        }

        let pending = center.pending();
        assert_eq!(pending.len(), PENDING_CAP);
        // The oldest entry (insertion order) was evicted.
        assert_eq!(pending[0].text, "notification 1");
        assert_eq!(pending[99].text, "notification 100");
        assert_eq!(store.notifications().len(), PENDING_CAP);
    }

    #[tokio::test]
    async fn should_evict_by_insertion_order_not_timestamp() {
        let store = MemoryStore::default();
        let log = MemoryLog::default();
        // Seed an entry whose timestamp is far in the future; FIFO eviction
        // must still drop it first.
        let future = homectl_domain::time::now() + chrono::Duration::days(365);
        let seeded = vec![PendingNotification::new("seeded first", future)];
        let (center, _rx) = NotificationCenter::new(store, log, seeded);

        for i in 0..PENDING_CAP {
            center.notify(format!("notification {i}")).await;
        }

        let pending = center.pending();
        assert_eq!(pending.len(), PENDING_CAP);
        assert!(pending.iter().all(|n| n.text != "seeded first"));
    }

    #[tokio::test]
    async fn should_return_identical_snapshots_between_inserts() {
        let (center, _, _, _rx) = center();
        center.notify("one").await;
        center.notify("two").await;

        let first = center.pending();
        let second = center.pending();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn should_render_fixed_reply_when_log_is_empty() {
        let (center, _, _, _rx) = center();
        assert_eq!(center.render_log_details().await, "No log entries found.");
    }

    #[tokio::test]
    async fn should_render_at_most_twenty_entries_newest_first() {
        let (center, _, _, _rx) = center();
        for i in 0..25 {
            center
                .log_event(EventKind::DeviceControl, format!("event {i}"), Some("Alice"), Some(1))
                .await;
        }

        let rendered = center.render_log_details().await;
        assert!(rendered.contains("Total Events: 25"));
        assert!(rendered.contains("Message: event 24"));
        assert!(!rendered.contains("Message: event 4\n"));
        // Newest entry carries ordinal 1.
        let first_pos = rendered.find("event 24").unwrap();
        let older_pos = rendered.find("event 20").unwrap();
        assert!(first_pos < older_pos);
    }

    #[tokio::test]
    async fn should_swallow_event_log_write_failures() {
        let (center, _, log, _rx) = center();
        log.fail_writes(true);

        // Must not panic or surface the error.
        center
            .log_event(EventKind::SecurityAlert, "alert", None, None)
            .await;
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn should_tail_recent_events_in_insertion_order() {
        let (center, _, _, _rx) = center();
        for i in 0..30 {
            center
                .log_event(EventKind::DeviceControl, format!("event {i}"), None, None)
                .await;
        }

        let recent = center.recent_events(20).await;
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].message, "event 10");
        assert_eq!(recent[19].message, "event 29");
    }
}
