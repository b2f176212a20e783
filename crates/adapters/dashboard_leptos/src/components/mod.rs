mod loading;
mod metric;
mod nav;
mod toast;

pub use loading::Loading;
pub use metric::MetricGroup;
pub use nav::Nav;
pub use toast::{ToastContainer, ToastNotifier};
