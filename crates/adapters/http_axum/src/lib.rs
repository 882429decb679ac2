//! # homectl-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** consumed by the mobile clients:
//!   `POST /api/send_message`, `GET /api/get_notifications`,
//!   `GET /api/get_events`, `GET /api/health`
//! - Map HTTP requests into hub calls (driving adapter)
//! - Map hub results into JSON responses
//!
//! ## Dependency rule
//! Depends on `homectl-app` (for the hub and port traits) and
//! `homectl-domain` (for types used in request/response mapping). Never
//! leaks axum types into the application layer.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
