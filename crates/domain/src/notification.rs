//! Pending notification — a bounded, pull-consumed record for client display.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::time::Timestamp;

/// Maximum number of pending notifications retained; older entries are
/// evicted oldest-first by insertion order.
pub const PENDING_CAP: usize = 100;

/// A notification awaiting pickup by polling clients.
///
/// Never mutated after creation. The `id` is a stable content hash so a
/// client can deduplicate across polls even after the cap evicts entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNotification {
    pub text: String,
    pub timestamp: Timestamp,
    pub id: u32,
}

impl PendingNotification {
    /// Create a notification with an identifier derived from its content.
    #[must_use]
    pub fn new(text: impl Into<String>, timestamp: Timestamp) -> Self {
        let text = text.into();
        let id = content_id(&text, timestamp);
        Self {
            text,
            timestamp,
            id,
        }
    }
}

/// Stable identifier from `(text, timestamp)`: the first four bytes of a
/// SHA-256 digest, read big-endian.
#[must_use]
pub fn content_id(text: &str, timestamp: Timestamp) -> u32 {
    let digest = Sha256::digest(format!("{text}{}", timestamp.to_rfc3339()));
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
