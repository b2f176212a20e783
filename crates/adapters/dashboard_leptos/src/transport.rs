//! Browser HTTP transport over `fetch` (gloo-net).

use std::pin::pin;
use std::time::Duration;

use futures_util::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use web_sys::AbortController;

use minermon_app::ports::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// Sends requests with `fetch`, aborting them when the deadline elapses.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let abort = AbortController::new()
            .map_err(|err| TransportError::Network(format!("{err:?}")))?;
        let signal = abort.signal();

        let builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        }
        .abort_signal(Some(&signal));
        let built = match request.body {
            Some(body) => builder.header("Content-Type", "application/json").body(body),
            None => builder.build(),
        }
        .map_err(|err| TransportError::Network(err.to_string()))?;

        let exchange = async move {
            let response = built.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, gloo_net::Error>(HttpResponse { status, body })
        };
        let deadline = TimeoutFuture::new(millis(request.timeout));

        match select(pin!(exchange), pin!(deadline)).await {
            Either::Left((result, _)) => {
                result.map_err(|err| TransportError::Network(err.to_string()))
            }
            Either::Right(((), _)) => {
                abort.abort();
                tracing::debug!(url = %request.url, "request aborted after timeout");
                Err(TransportError::Timeout(request.timeout))
            }
        }
    }
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
