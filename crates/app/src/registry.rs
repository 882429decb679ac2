//! Device registry — in-memory authoritative state of the appliances and
//! the security subsystem.
//!
//! Mutated only through the command interpreter and the scheduler. All
//! access goes through one lock; the loops and request handlers share the
//! registry concurrently.

use parking_lot::Mutex;

use homectl_domain::appliance::{Appliance, ApplianceKind, SwitchState};
use homectl_domain::pin::PinAssignments;
use homectl_domain::security::SecuritySystem;

/// Point-in-time view of all device state, for status replies and reads.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot {
    pub appliances: [Appliance; 3],
    pub security: SecuritySystem,
}

struct RegistryState {
    appliances: [Appliance; 3],
    security: SecuritySystem,
}

/// Thread-safe registry of the three appliances plus the security system.
pub struct DeviceRegistry {
    inner: Mutex<RegistryState>,
}

impl DeviceRegistry {
    /// Create the registry with every appliance off and security inactive.
    #[must_use]
    pub fn new(pins: &PinAssignments) -> Self {
        let appliances = [
            Appliance::new(ApplianceKind::Light, pins.light),
            Appliance::new(ApplianceKind::Ac, pins.ac),
            Appliance::new(ApplianceKind::WashingMachine, pins.washing_machine),
        ];
        Self {
            inner: Mutex::new(RegistryState {
                appliances,
                security: SecuritySystem::new(pins),
            }),
        }
    }

    /// Pin assigned to the given appliance.
    #[must_use]
    pub fn pin_of(&self, kind: ApplianceKind) -> u8 {
        let state = self.inner.lock();
        state.appliances[index_of(kind)].pin
    }

    /// Current switch state of the given appliance.
    #[must_use]
    pub fn state_of(&self, kind: ApplianceKind) -> SwitchState {
        let state = self.inner.lock();
        state.appliances[index_of(kind)].state
    }

    /// Record a successful transition. Callers must only do this after
    /// actuation reported success.
    pub fn set_state(&self, kind: ApplianceKind, switch: SwitchState) {
        let mut state = self.inner.lock();
        state.appliances[index_of(kind)].state = switch;
    }

    /// Copy of the security subsystem state.
    #[must_use]
    pub fn security(&self) -> SecuritySystem {
        self.inner.lock().security
    }

    /// Arm or disarm the security subsystem.
    pub fn set_security_active(&self, active: bool) {
        self.inner.lock().security.active = active;
    }

    /// Consistent snapshot of everything, taken under one lock.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        let state = self.inner.lock();
        StatusSnapshot {
            appliances: state.appliances,
            security: state.security,
        }
    }
}

fn index_of(kind: ApplianceKind) -> usize {
    match kind {
        ApplianceKind::Light => 0,
        ApplianceKind::Ac => 1,
        ApplianceKind::WashingMachine => 2,
    }
}
