//! Storage ports — persistence for the controller's four record collections.
//!
//! Implementations recover from corrupted data on load (backup and fall
//! back to the empty default) and retry transient failures on save, so a
//! storage fault never takes the controller down.

use std::collections::HashSet;
use std::future::Future;

use homectl_domain::error::PersistenceError;
use homectl_domain::event::EventLogEntry;
use homectl_domain::notification::PendingNotification;
use homectl_domain::schedule::ScheduledTask;

/// Durable storage for the chat registry, scheduled tasks, and pending
/// notifications.
pub trait StateStore {
    /// Load the set of caller identifiers ever seen.
    fn load_chat_ids(
        &self,
    ) -> impl Future<Output = Result<HashSet<i64>, PersistenceError>> + Send;

    /// Persist the chat registry.
    fn save_chat_ids(
        &self,
        ids: &HashSet<i64>,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Load all pending scheduled tasks.
    fn load_tasks(
        &self,
    ) -> impl Future<Output = Result<Vec<ScheduledTask>, PersistenceError>> + Send;

    /// Persist the pending task set.
    fn save_tasks(
        &self,
        tasks: &[ScheduledTask],
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Load the pending notification list.
    fn load_notifications(
        &self,
    ) -> impl Future<Output = Result<Vec<PendingNotification>, PersistenceError>> + Send;

    /// Persist the pending notification list.
    fn save_notifications(
        &self,
        notifications: &[PendingNotification],
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// Append-only audit trail of all meaningful actions.
pub trait EventLog {
    /// Append one record. Records are never mutated or deleted.
    fn append(
        &self,
        entry: &EventLogEntry,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Read every record in insertion order. Unreadable records are
    /// skipped, not fatal.
    fn read_all(
        &self,
    ) -> impl Future<Output = Result<Vec<EventLogEntry>, PersistenceError>> + Send;
}

impl<T: StateStore + Send + Sync> StateStore for std::sync::Arc<T> {
    fn load_chat_ids(
        &self,
    ) -> impl Future<Output = Result<HashSet<i64>, PersistenceError>> + Send {
        (**self).load_chat_ids()
    }

    fn save_chat_ids(
        &self,
        ids: &HashSet<i64>,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        (**self).save_chat_ids(ids)
    }

    fn load_tasks(
        &self,
    ) -> impl Future<Output = Result<Vec<ScheduledTask>, PersistenceError>> + Send {
        (**self).load_tasks()
    }

    fn save_tasks(
        &self,
        tasks: &[ScheduledTask],
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        (**self).save_tasks(tasks)
    }

    fn load_notifications(
        &self,
    ) -> impl Future<Output = Result<Vec<PendingNotification>, PersistenceError>> + Send {
        (**self).load_notifications()
    }

    fn save_notifications(
        &self,
        notifications: &[PendingNotification],
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        (**self).save_notifications(notifications)
    }
}

impl<T: EventLog + Send + Sync> EventLog for std::sync::Arc<T> {
    fn append(
        &self,
        entry: &EventLogEntry,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        (**self).append(entry)
    }

    fn read_all(
        &self,
    ) -> impl Future<Output = Result<Vec<EventLogEntry>, PersistenceError>> + Send {
        (**self).read_all()
    }
}
