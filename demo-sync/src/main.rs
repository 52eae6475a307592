use axum::{Router, routing::get};

use identity_sync_axum::{WEBHOOK_ROUTE_PATH, Webhook, identity_sync_router};

mod server;

use crate::server::{Ports, TlsFiles, init_tracing, spawn_http_server, spawn_https_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    // A receiver without its signing secret cannot verify anything, so refuse to start
    let webhook = Webhook::from_env().inspect_err(|e| {
        tracing::error!("Webhook configuration error: {}", e);
    })?;

    identity_sync_axum::init().await?;

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(identity_sync_router(webhook));

    let ports = Ports::from_env();
    let mut servers = vec![spawn_http_server(ports.http, app.clone())];

    match (ports.https, TlsFiles::from_env()) {
        (Some(port), Some(tls)) => servers.push(spawn_https_server(port, tls, app).await?),
        (Some(_), None) => {
            tracing::warn!("HTTPS_PORT is set but TLS_CERT_PATH/TLS_KEY_PATH are not; serving HTTP only")
        }
        _ => {}
    }

    tracing::info!(
        "Accepting Clerk webhooks at {} on port {}",
        WEBHOOK_ROUTE_PATH.as_str(),
        ports.http
    );

    for server in servers {
        server.await?;
    }
    Ok(())
}
