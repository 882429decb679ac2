//! Event log entry — an immutable record in the append-only audit trail.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Kind of audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    UserJoined,
    DeviceControl,
    ScheduledTaskCreated,
    ScheduledTaskExecuted,
    SecuritySystemActivated,
    SecuritySystemDeactivated,
    SecurityAlert,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UserJoined => "user_joined",
            Self::DeviceControl => "device_control",
            Self::ScheduledTaskCreated => "scheduled_task_created",
            Self::ScheduledTaskExecuted => "scheduled_task_executed",
            Self::SecuritySystemActivated => "security_system_activated",
            Self::SecuritySystemDeactivated => "security_system_deactivated",
            Self::SecurityAlert => "security_alert",
        };
        f.write_str(label)
    }
}

/// One record in the event log. Strictly append-only, never mutated.
///
/// Stored in insertion order; read-side consumers sort descending by
/// timestamp when presenting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub timestamp: Timestamp,
    pub event_type: EventKind,
    pub message: String,
    pub user_name: Option<String>,
    pub user_id: Option<i64>,
}

impl EventLogEntry {
    /// Create an entry stamped with the given time.
    #[must_use]
    pub fn new(
        timestamp: Timestamp,
        event_type: EventKind,
        message: impl Into<String>,
        user_name: Option<String>,
        user_id: Option<i64>,
    ) -> Self {
        Self {
            timestamp,
            event_type,
            message: message.into(),
            user_name,
            user_id,
        }
    }
}
