//! Digital pin primitives for the actuation boundary.

use serde::{Deserialize, Serialize};

/// Logical level of a digital pin.
///
/// Relay polarity (active-low vs active-high wiring) is the hardware
/// binding's concern; the domain only speaks in logical levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinLevel {
    High,
    Low,
}

/// Pin assignment for every actuated module the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAssignments {
    pub light: u8,
    pub ac: u8,
    pub washing_machine: u8,
    pub laser: u8,
    pub sensor: u8,
    pub buzzer: u8,
}

impl Default for PinAssignments {
    fn default() -> Self {
        Self {
            light: 23,
            ac: 24,
            washing_machine: 25,
            laser: 27,
            sensor: 22,
            buzzer: 5,
        }
    }
}
