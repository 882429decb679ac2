//! # homectl-adapter-pin-virtual
//!
//! Simulated pin bank for running the controller without real hardware.
//! Every pin starts low; writes are remembered, reads return the last
//! written level. Sensor pins can be driven from the outside (tests,
//! demos) through [`VirtualPinDriver::set_level`].
//!
//! ## Dependency rule
//!
//! Depends on `homectl-app` (port traits) and `homectl-domain` only.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use homectl_app::ports::PinDriver;
use homectl_domain::error::ActuationError;
use homectl_domain::pin::PinLevel;

/// In-memory pin bank implementing the actuation port.
///
/// Clones share the same bank, so the daemon can hand one clone to the
/// hub and keep another for external stimulation.
#[derive(Clone, Default)]
pub struct VirtualPinDriver {
    levels: Arc<Mutex<HashMap<u8, PinLevel>>>,
}

impl VirtualPinDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive a pin from the outside, simulating a sensor input.
    pub fn set_level(&self, pin: u8, level: PinLevel) {
        self.levels.lock().insert(pin, level);
    }

    /// Last level written to the pin, if any.
    #[must_use]
    pub fn level_of(&self, pin: u8) -> Option<PinLevel> {
        self.levels.lock().get(&pin).copied()
    }
}

impl PinDriver for VirtualPinDriver {
    async fn set_pin(&self, pin: u8, level: PinLevel) -> Result<(), ActuationError> {
        self.levels.lock().insert(pin, level);
        tracing::debug!(pin, ?level, "virtual pin written");
        Ok(())
    }

    async fn read_pin(&self, pin: u8) -> Result<PinLevel, ActuationError> {
        Ok(self.levels.lock().get(&pin).copied().unwrap_or(PinLevel::Low))
    }
}
