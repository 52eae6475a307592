//! Router for the Clerk webhook endpoint

use axum::Router;
use identity_sync::Webhook;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Create the router serving `POST {WEBHOOK_ROUTE_PATH}`
///
/// The verifier is built once by the caller, typically with `Webhook::from_env()`
/// at startup, and shared by every request.
pub fn identity_sync_router(webhook: Webhook) -> Router {
    super::webhook::router(webhook).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`identity_sync_router`] without the HTTP tracing middleware
pub fn identity_sync_router_no_trace(webhook: Webhook) -> Router {
    super::webhook::router(webhook)
}
