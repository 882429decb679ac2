//! # homectl-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PinDriver` — the abstract actuation capability
//!   - `StateStore` — persistence for chat ids, tasks, and notifications
//!   - `EventLog` — the append-only audit trail
//!   - `Broadcaster` — push delivery of notifications (future transports)
//! - Provide the **command interpreter** (free-text → intent → actuation)
//! - Provide the **scheduler** (deferred actuation, security monitoring)
//! - Provide the **notification center** (bounded pending list, event log)
//! - Provide the **delivery loop** (drains the internal push queue)
//!
//! ## Dependency rule
//! Depends on `homectl-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod actuator;
pub mod delivery;
pub mod hub;
pub mod interpreter;
pub mod monitor;
pub mod notifier;
pub mod ports;
pub mod registry;
pub mod retry;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testutil;
