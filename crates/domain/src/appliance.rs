//! Appliance — one of the three fixed actuated devices.

use serde::{Deserialize, Serialize};

use crate::pin::PinLevel;

/// The three appliances the controller drives. Fixed at process start,
/// never created or destroyed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceKind {
    Light,
    Ac,
    WashingMachine,
}

impl ApplianceKind {
    /// All appliances, in presentation order.
    pub const ALL: [Self; 3] = [Self::Light, Self::Ac, Self::WashingMachine];

    /// Human-readable name used in replies and notifications.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Ac => "Air Conditioner",
            Self::WashingMachine => "Washing Machine",
        }
    }

    /// Stable machine identifier used in persisted records.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Ac => "ac",
            Self::WashingMachine => "washing_machine",
        }
    }

    /// Emoji used in status-query replies.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Light => "💡",
            Self::Ac => "❄️",
            Self::WashingMachine => "🧺",
        }
    }
}

/// On/off state of an appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    /// Upper-case label used in notifications (`ON` / `OFF`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Title-case label used in status replies (`On` / `Off`).
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }

    /// Pin level that realizes this state.
    #[must_use]
    pub fn level(self) -> PinLevel {
        match self {
            Self::On => PinLevel::High,
            Self::Off => PinLevel::Low,
        }
    }
}

/// An appliance with its current state and assigned pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appliance {
    pub kind: ApplianceKind,
    pub state: SwitchState,
    pub pin: u8,
}

impl Appliance {
    /// Create an appliance in the `Off` state on the given pin.
    #[must_use]
    pub fn new(kind: ApplianceKind, pin: u8) -> Self {
        Self {
            kind,
            state: SwitchState::Off,
            pin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_display_names() {
        assert_eq!(ApplianceKind::Light.display_name(), "Light");
        assert_eq!(ApplianceKind::Ac.display_name(), "Air Conditioner");
        assert_eq!(
            ApplianceKind::WashingMachine.display_name(),
            "Washing Machine"
        );
    }

    #[test]
    fn should_serialize_kind_as_snake_case() {
        let json = serde_json::to_string(&ApplianceKind::WashingMachine).unwrap();
        assert_eq!(json, "\"washing_machine\"");
    }

    #[test]
    fn should_serialize_state_as_lowercase() {
        assert_eq!(serde_json::to_string(&SwitchState::On).unwrap(), "\"on\"");
        assert_eq!(serde_json::to_string(&SwitchState::Off).unwrap(), "\"off\"");
    }

    #[test]
    fn should_map_on_to_high_level() {
        assert_eq!(SwitchState::On.level(), PinLevel::High);
        assert_eq!(SwitchState::Off.level(), PinLevel::Low);
    }

    #[test]
    fn should_start_appliances_off() {
        let appliance = Appliance::new(ApplianceKind::Light, 23);
        assert_eq!(appliance.state, SwitchState::Off);
        assert_eq!(appliance.pin, 23);
    }
}
