use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::{env, net::SocketAddr, path::PathBuf};
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_HTTP_PORT: u16 = 3001;

pub(crate) fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,identity_sync=debug,identity_sync_axum=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Ports {
    pub(crate) http: u16,
    pub(crate) https: Option<u16>,
}

impl Ports {
    pub(crate) fn from_env() -> Self {
        Self {
            http: parse_port("PORT").unwrap_or(DEFAULT_HTTP_PORT),
            https: parse_port("HTTPS_PORT"),
        }
    }
}

fn parse_port(name: &str) -> Option<u16> {
    let value = env::var(name).ok()?;
    match value.trim().parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}: {}", name, value);
            None
        }
    }
}

/// Certificate and key for the HTTPS listener
#[derive(Debug)]
pub(crate) struct TlsFiles {
    cert: PathBuf,
    key: PathBuf,
}

impl TlsFiles {
    pub(crate) fn from_env() -> Option<Self> {
        Some(Self {
            cert: env::var("TLS_CERT_PATH").ok()?.into(),
            key: env::var("TLS_KEY_PATH").ok()?.into(),
        })
    }
}

pub(crate) fn spawn_http_server(port: u16, app: Router) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::debug!("HTTP server listening on {}", addr);
        if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
            tracing::error!("HTTP server on {} stopped: {}", addr, e);
        }
    })
}

pub(crate) async fn spawn_https_server(
    port: u16,
    tls: TlsFiles,
    app: Router,
) -> Result<JoinHandle<()>, std::io::Error> {
    // rustls needs a process-level provider before the config is built
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls CryptoProvider already installed");
    }

    let config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::debug!("HTTPS server listening on {}", addr);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum_server::bind_rustls(addr, config)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("HTTPS server on {} stopped: {}", addr, e);
        }
    }))
}
