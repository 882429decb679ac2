//! # homectl-adapter-store-json
//!
//! Persistence over plain files in one state directory:
//!
//! | File | Content |
//! |------|---------|
//! | `chat_ids.json` | JSON array of caller identifiers |
//! | `scheduled_tasks.json` | JSON array of scheduled tasks |
//! | `pending_notifications.json` | JSON array of pending notifications |
//! | `events.log` | append-only JSON lines, one event per line |
//!
//! Loads and saves are both retried up to three times. A load that still
//! fails after the retries never fails startup: an undecodable state file
//! is copied to a timestamped `.backup.*` sibling and the load yields the
//! empty default. Saves write a sibling temp file and rename over the
//! target.
//!
//! ## Dependency rule
//!
//! Depends on `homectl-app` (port traits) and `homectl-domain` only.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde::de::DeserializeOwned;

use homectl_app::ports::{EventLog, StateStore};
use homectl_app::retry::with_retries;
use homectl_domain::error::PersistenceError;
use homectl_domain::event::EventLogEntry;
use homectl_domain::notification::PendingNotification;
use homectl_domain::schedule::ScheduledTask;

const CHAT_IDS_FILE: &str = "chat_ids.json";
const SCHEDULED_TASKS_FILE: &str = "scheduled_tasks.json";
const PENDING_NOTIFICATIONS_FILE: &str = "pending_notifications.json";
const EVENTS_LOG_FILE: &str = "events.log";

const IO_ATTEMPTS: u32 = 3;
const IO_RETRY_DELAY: Duration = Duration::from_secs(1);

/// File-backed implementation of the persistence ports.
#[derive(Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open (and create if needed) the state directory.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read one state file, retried. A missing file yields the default.
    /// After the retries are exhausted a decode failure backs the file up,
    /// and every failure yields the default, so a bad state file can never
    /// prevent startup.
    async fn load_json<T>(&self, name: &str) -> Result<T, PersistenceError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_of(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let loaded = with_retries(IO_ATTEMPTS, IO_RETRY_DELAY, || {
            let path = path.clone();
            async move {
                let raw = fs::read_to_string(&path)?;
                Ok::<T, PersistenceError>(serde_json::from_str(&raw)?)
            }
        })
        .await;
        match loaded {
            Ok(value) => Ok(value),
            Err(PersistenceError::Decode(err)) => {
                tracing::error!(file = name, error = %err, "state file corrupted, starting fresh");
                backup_corrupted(&path);
                Ok(T::default())
            }
            Err(err) => {
                tracing::error!(file = name, error = %err, "state file unreadable, starting fresh");
                Ok(T::default())
            }
        }
    }

    /// Write one state file atomically (temp file + rename), retried.
    async fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), PersistenceError> {
        let path = self.path_of(name);
        let tmp = path.with_extension("json.tmp");
        let payload = serde_json::to_vec_pretty(value)?;
        with_retries(IO_ATTEMPTS, IO_RETRY_DELAY, || {
            let (path, tmp, payload) = (path.clone(), tmp.clone(), payload.clone());
            async move {
                fs::write(&tmp, &payload)?;
                fs::rename(&tmp, &path)?;
                Ok::<(), PersistenceError>(())
            }
        })
        .await
    }
}

/// Copy a corrupted file next to itself with a timestamped suffix. A
/// failed backup is logged and the file is abandoned in place.
fn backup_corrupted(path: &Path) {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return;
    };
    let backup = path.with_file_name(format!("{name}.backup.{stamp}"));
    match fs::copy(path, &backup) {
        Ok(_) => tracing::info!(backup = %backup.display(), "backed up corrupted state file"),
        Err(err) => tracing::error!(error = %err, "failed to back up corrupted state file"),
    }
}

impl StateStore for JsonStore {
    async fn load_chat_ids(&self) -> Result<HashSet<i64>, PersistenceError> {
        self.load_json(CHAT_IDS_FILE).await
    }

    async fn save_chat_ids(&self, ids: &HashSet<i64>) -> Result<(), PersistenceError> {
        self.save_json(CHAT_IDS_FILE, ids).await
    }

    async fn load_tasks(&self) -> Result<Vec<ScheduledTask>, PersistenceError> {
        self.load_json(SCHEDULED_TASKS_FILE).await
    }

    async fn save_tasks(&self, tasks: &[ScheduledTask]) -> Result<(), PersistenceError> {
        self.save_json(SCHEDULED_TASKS_FILE, &tasks).await
    }

    async fn load_notifications(&self) -> Result<Vec<PendingNotification>, PersistenceError> {
        self.load_json(PENDING_NOTIFICATIONS_FILE).await
    }

    async fn save_notifications(
        &self,
        notifications: &[PendingNotification],
    ) -> Result<(), PersistenceError> {
        self.save_json(PENDING_NOTIFICATIONS_FILE, &notifications)
            .await
    }
}

impl EventLog for JsonStore {
    async fn append(&self, entry: &EventLogEntry) -> Result<(), PersistenceError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_of(EVENTS_LOG_FILE))?;
        file.write_all(&line)?;
        Ok(())
    }

    /// Read the whole log in stored order. Undecodable lines are skipped
    /// so one bad write never hides the rest of the trail.
    async fn read_all(&self) -> Result<Vec<EventLogEntry>, PersistenceError> {
        let path = self.path_of(EVENTS_LOG_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping undecodable event log line");
                    None
                }
            })
            .collect())
    }
}
