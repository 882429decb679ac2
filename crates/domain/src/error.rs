//! Common error types used across the workspace.
//!
//! Each layer works with the typed error closest to its concern
//! (`ActuationError` at the pin boundary, `PersistenceError` at the
//! storage boundary) and converts into [`HomeCtlError`] via `#[from]`
//! where an umbrella type is needed.

/// Umbrella error for the application layer.
#[derive(Debug, thiserror::Error)]
pub enum HomeCtlError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("actuation error")]
    Actuation(#[from] ActuationError),

    #[error("persistence error")]
    Persistence(#[from] PersistenceError),
}

/// Malformed input at the processing boundary. Surfaced to the caller as
/// a rejected request.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("message is required")]
    MissingMessage,
}

/// A pin operation failed after all retries were exhausted. The device
/// state is left unchanged by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pin {pin} did not respond after {attempts} attempts")]
pub struct ActuationError {
    pub pin: u8,
    pub attempts: u32,
}

/// Storage read/write or decode failure. Recovered locally (backup and
/// default) and never surfaced to the command caller.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage io failure")]
    Io(#[from] std::io::Error),

    #[error("storage decode failure")]
    Decode(#[from] serde_json::Error),
}

/// A push delivery attempt failed. Counted by the delivery loop, never
/// fatal.
#[derive(Debug, thiserror::Error)]
#[error("notification delivery failed: {reason}")]
pub struct DeliveryError {
    pub reason: String,
}
