//! # minermon-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve any [`DeviceBackend`](minermon_app::ports::DeviceBackend) under
//!   the monitor's REST contract (`/api/sensors`, `/api/relays/{id}`, …)
//! - Wrap every answer in the `{success, data, error}` envelope, failures
//!   included
//! - Serve the compiled dashboard assets at `/` when a directory is given
//!
//! ## Dependency rule
//! Depends on `minermon-app` (for the backend port) and `minermon-domain`
//! (for the wire models). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
