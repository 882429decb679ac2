//! Security system — laser barrier, light sensor, and buzzer.

use crate::pin::PinAssignments;

/// Singleton state of the home security subsystem.
///
/// Toggled only by explicit initialize/terminate intents. Re-arming an
/// already-active system is legal and re-actuates all modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecuritySystem {
    pub active: bool,
    pub laser_pin: u8,
    pub sensor_pin: u8,
    pub buzzer_pin: u8,
}

impl SecuritySystem {
    /// Create an inactive security system wired to the given pins.
    #[must_use]
    pub fn new(pins: &PinAssignments) -> Self {
        Self {
            active: false,
            laser_pin: pins.laser,
            sensor_pin: pins.sensor,
            buzzer_pin: pins.buzzer,
        }
    }

    /// Status label used in replies (`ACTIVE` / `INACTIVE`).
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.active { "ACTIVE" } else { "INACTIVE" }
    }
}
