//! In-memory port implementations shared by the application-layer tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use homectl_domain::error::{ActuationError, PersistenceError};
use homectl_domain::event::EventLogEntry;
use homectl_domain::notification::PendingNotification;
use homectl_domain::pin::PinLevel;
use homectl_domain::schedule::ScheduledTask;

use crate::actuator::RetryingDriver;
use crate::hub::Hub;
use crate::ports::{EventLog, PinDriver, StateStore};

/// Fully wired hub over the in-memory ports, with zero retry delay.
pub(crate) async fn test_hub() -> (
    Hub<MemoryPins, MemoryStore, MemoryLog>,
    MemoryPins,
    MemoryStore,
    MemoryLog,
    tokio::sync::mpsc::UnboundedReceiver<String>,
) {
    let pins = MemoryPins::default();
    let store = MemoryStore::default();
    let log = MemoryLog::default();
    let actuator = RetryingDriver::with_policy(pins.clone(), 3, std::time::Duration::ZERO);
    let (hub, rx) = Hub::load(
        actuator,
        store.clone(),
        log.clone(),
        homectl_domain::pin::PinAssignments::default(),
    )
    .await;
    (hub, pins, store, log, rx)
}

/// In-memory pin driver with scriptable failures.
#[derive(Clone, Default)]
pub(crate) struct MemoryPins {
    inner: Arc<MemoryPinsInner>,
}

#[derive(Default)]
struct MemoryPinsInner {
    levels: Mutex<HashMap<u8, PinLevel>>,
    failures_left: AtomicU32,
    set_calls: AtomicU32,
}

impl MemoryPins {
    pub(crate) fn set_level(&self, pin: u8, level: PinLevel) {
        self.inner.levels.lock().insert(pin, level);
    }

    pub(crate) fn level_of(&self, pin: u8) -> Option<PinLevel> {
        self.inner.levels.lock().get(&pin).copied()
    }

    /// Make the next `count` operations fail.
    pub(crate) fn fail_next(&self, count: u32) {
        self.inner.failures_left.store(count, Ordering::SeqCst);
    }

    pub(crate) fn set_calls(&self) -> u32 {
        self.inner.set_calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self, pin: u8) -> Option<ActuationError> {
        let left = self.inner.failures_left.load(Ordering::SeqCst);
        if left == 0 {
            return None;
        }
        if left != u32::MAX {
            self.inner.failures_left.store(left - 1, Ordering::SeqCst);
        }
        Some(ActuationError { pin, attempts: 1 })
    }
}

impl PinDriver for MemoryPins {
    async fn set_pin(&self, pin: u8, level: PinLevel) -> Result<(), ActuationError> {
        self.inner.set_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_failure(pin) {
            return Err(err);
        }
        self.inner.levels.lock().insert(pin, level);
        Ok(())
    }

    async fn read_pin(&self, pin: u8) -> Result<PinLevel, ActuationError> {
        if let Some(err) = self.take_failure(pin) {
            return Err(err);
        }
        Ok(self
            .inner
            .levels
            .lock()
            .get(&pin)
            .copied()
            .unwrap_or(PinLevel::Low))
    }
}

/// In-memory state store.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    chat_ids: Mutex<HashSet<i64>>,
    tasks: Mutex<Vec<ScheduledTask>>,
    notifications: Mutex<Vec<PendingNotification>>,
}

impl MemoryStore {
    pub(crate) fn notifications(&self) -> Vec<PendingNotification> {
        self.inner.notifications.lock().clone()
    }

    pub(crate) fn tasks(&self) -> Vec<ScheduledTask> {
        self.inner.tasks.lock().clone()
    }

    pub(crate) fn chat_ids(&self) -> HashSet<i64> {
        self.inner.chat_ids.lock().clone()
    }
}

impl StateStore for MemoryStore {
    async fn load_chat_ids(&self) -> Result<HashSet<i64>, PersistenceError> {
        Ok(self.inner.chat_ids.lock().clone())
    }

    async fn save_chat_ids(&self, ids: &HashSet<i64>) -> Result<(), PersistenceError> {
        *self.inner.chat_ids.lock() = ids.clone();
        Ok(())
    }

    async fn load_tasks(&self) -> Result<Vec<ScheduledTask>, PersistenceError> {
        Ok(self.inner.tasks.lock().clone())
    }

    async fn save_tasks(&self, tasks: &[ScheduledTask]) -> Result<(), PersistenceError> {
        *self.inner.tasks.lock() = tasks.to_vec();
        Ok(())
    }

    async fn load_notifications(&self) -> Result<Vec<PendingNotification>, PersistenceError> {
        Ok(self.inner.notifications.lock().clone())
    }

    async fn save_notifications(
        &self,
        notifications: &[PendingNotification],
    ) -> Result<(), PersistenceError> {
        *self.inner.notifications.lock() = notifications.to_vec();
        Ok(())
    }
}

/// In-memory event log with scriptable write failures.
#[derive(Clone, Default)]
pub(crate) struct MemoryLog {
    inner: Arc<MemoryLogInner>,
}

#[derive(Default)]
struct MemoryLogInner {
    entries: Mutex<Vec<EventLogEntry>>,
    fail_writes: Mutex<bool>,
}

impl MemoryLog {
    pub(crate) fn entries(&self) -> Vec<EventLogEntry> {
        self.inner.entries.lock().clone()
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        *self.inner.fail_writes.lock() = fail;
    }
}

impl EventLog for MemoryLog {
    async fn append(&self, entry: &EventLogEntry) -> Result<(), PersistenceError> {
        if *self.inner.fail_writes.lock() {
            return Err(PersistenceError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "write disabled",
            )));
        }
        self.inner.entries.lock().push(entry.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<EventLogEntry>, PersistenceError> {
        Ok(self.inner.entries.lock().clone())
    }
}
