//! Actuation port — the abstract capability to drive and read digital pins.
//!
//! The hardware binding behind this trait is an external collaborator; the
//! workspace ships a simulated implementation for environments without
//! hardware.

use std::future::Future;

use homectl_domain::error::ActuationError;
use homectl_domain::pin::PinLevel;

/// Sets and reads digital pin levels.
pub trait PinDriver {
    /// Drive a pin to the given level.
    fn set_pin(
        &self,
        pin: u8,
        level: PinLevel,
    ) -> impl Future<Output = Result<(), ActuationError>> + Send;

    /// Read the current level of a pin.
    fn read_pin(&self, pin: u8) -> impl Future<Output = Result<PinLevel, ActuationError>> + Send;
}

impl<T: PinDriver + Send + Sync> PinDriver for std::sync::Arc<T> {
    fn set_pin(
        &self,
        pin: u8,
        level: PinLevel,
    ) -> impl Future<Output = Result<(), ActuationError>> + Send {
        (**self).set_pin(pin, level)
    }

    fn read_pin(&self, pin: u8) -> impl Future<Output = Result<PinLevel, ActuationError>> + Send {
        (**self).read_pin(pin)
    }
}
