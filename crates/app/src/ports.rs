//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the page logic and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod backend;
pub mod device_api;
pub mod notifier;
pub mod scheduler;
pub mod transport;

pub use backend::DeviceBackend;
pub use device_api::DeviceApi;
pub use notifier::{NoticeLevel, Notifier};
pub use scheduler::{Scheduler, TaskHandle, Tick};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
