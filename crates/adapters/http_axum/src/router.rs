//! Axum router assembly.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use minermon_app::ports::DeviceBackend;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the device API under `/api` and, when `assets` is given, serves the
/// compiled dashboard from that directory for every other path.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<B: DeviceBackend>(state: AppState<B>, assets: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes());

    let router = match assets {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).append_index_html_on_directories(true),
        ),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
