//! # minermon-domain
//!
//! Pure domain model for the minermon device dashboard.
//!
//! ## Responsibilities
//! - Wire models exchanged with the device: **sensor readings**, **relay
//!   states**, **system status**, **logs**, **WiFi settings**, and the
//!   **virtual sensor** configuration
//! - The canonical response [`envelope`] shared by the device and its clients
//! - Display rules: [`format`] helpers and threshold-based [`color`] buckets
//! - Input validation ([`net::is_valid_ip`], relay ids, sensor pins)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod color;
pub mod envelope;
pub mod format;
pub mod log;
pub mod net;
pub mod relay;
pub mod sensor;
pub mod system;
pub mod wifi;
