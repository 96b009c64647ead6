//! Request tracing and logging middleware.

use axum::Router;
use axum::http::header;
use tower::ServiceBuilder;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates trace layer logging method, path, status and latency of every request.
pub fn create_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

/// Creates sensitive headers layer to redact auth info from logs.
pub fn create_sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION, header::COOKIE])
}

/// Extension trait for `axum::`[`Router`] for layering request logging.
pub trait RouterObservabilityExt<S> {
    /// Layers [`SetSensitiveRequestHeaders`] and [`Trace`] middlewares.
    ///
    /// [`SetSensitiveRequestHeaders`]: tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer
    /// [`Trace`]: tower_http::trace::TraceLayer
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(create_sensitive_headers_layer())
            .layer(create_trace_layer());

        self.layer(middlewares)
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn passes_requests_through() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_observability();
        let server = TestServer::new(router)?;

        let response = server
            .get("/")
            .add_header(header::AUTHORIZATION, "Bearer secret")
            .await;
        response.assert_status_ok();
        response.assert_text("ok");
        Ok(())
    }
}
