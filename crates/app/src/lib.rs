//! # minermon-app
//!
//! Application layer: **port definitions** (traits), the device API client and
//! the page lifecycle that drives the dashboard.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `Transport`: send one HTTP request with a deadline
//!   - `Scheduler`: run a repeating task until its handle is cancelled
//!   - `Notifier`: show a transient message to the user
//!   - `DeviceBackend`: the device side of the REST contract (served by the dev server)
//! - Provide `DeviceApi` and its HTTP implementation [`client::HttpDeviceApi`]
//! - Own the **page lifecycle** ([`lifecycle`]) and **navigation** ([`navigator`])
//! - Implement each page's data loading and user actions ([`pages`])
//!
//! ## Dependency rule
//! Depends on `minermon-domain` only. Never imports adapter crates or a web
//! framework; the Leptos front end observes [`view::ViewCell`]s instead.
//!
//! ## Concurrency
//! Everything here runs on a single-threaded event loop. Futures are not
//! `Send` and shared state uses `Rc`/`RefCell`.

pub mod client;
pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod navigator;
pub mod pages;
pub mod ports;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
