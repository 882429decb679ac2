//! Scheduled task — a deferred actuation request with an absolute due time.

use serde::{Deserialize, Serialize};

use crate::appliance::{ApplianceKind, SwitchState};
use crate::time::Timestamp;

/// A deferred on/off request, executed exactly once when due.
///
/// Duplicates are legal: two tasks for the same `(device, scheduled_time,
/// user_name)` triple each fire independently. There is no cancellation;
/// a task leaves the pending set only by executing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub device: ApplianceKind,
    pub action: SwitchState,
    pub scheduled_time: Timestamp,
    pub user_name: String,
}

impl ScheduledTask {
    /// Whether the task is due at the given instant.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.scheduled_time <= now
    }
}
