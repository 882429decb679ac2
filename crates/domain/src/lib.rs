//! # homectl-domain
//!
//! Pure domain model for the homectl home automation controller.
//!
//! ## Responsibilities
//! - Foundational types: timestamps, pin levels, error conventions
//! - Define **Appliances** (the three fixed actuated devices and their states)
//! - Define the **Security System** (laser barrier + light sensor + buzzer)
//! - Define **Scheduled Tasks** (deferred actuation requests)
//! - Define **Pending Notifications** (bounded, pull-consumed client records)
//! - Define **Event Log Entries** (append-only audit trail)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod appliance;
pub mod error;
pub mod event;
pub mod notification;
pub mod pin;
pub mod schedule;
pub mod security;
pub mod time;
