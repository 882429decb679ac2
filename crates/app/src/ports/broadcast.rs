//! Broadcast port — push delivery of notifications to connected clients.
//!
//! Pull-based clients poll the pending list instead; this port exists for
//! push transports and is drained by the delivery loop.

use std::future::Future;

use homectl_domain::error::DeliveryError;

/// Delivers one notification to all connected applications.
pub trait Broadcaster {
    /// Attempt delivery. Failures are counted by the delivery loop and
    /// never fatal.
    fn deliver(&self, text: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

impl<T: Broadcaster + Send + Sync> Broadcaster for std::sync::Arc<T> {
    fn deliver(&self, text: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).deliver(text)
    }
}
