use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};

use identity_sync::{WEBHOOK_ROUTE_PATH, Webhook, handle_clerk_webhook_core};

use super::error::IntoResponseError;

pub(super) fn router(webhook: Webhook) -> Router {
    Router::new()
        .route(WEBHOOK_ROUTE_PATH.as_str(), post(clerk_webhook))
        .with_state(Arc::new(webhook))
}

/// Takes the body as raw bytes so the signature is checked over exactly what was sent
async fn clerk_webhook(
    State(webhook): State<Arc<Webhook>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, String), (StatusCode, String)> {
    let outcome = handle_clerk_webhook_core(&webhook, &headers, &body)
        .await
        .into_response_error()?;

    Ok((StatusCode::OK, outcome.message()))
}
