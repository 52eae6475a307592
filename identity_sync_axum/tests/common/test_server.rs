use std::sync::Once;

use chrono::Utc;
use identity_sync::{SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER, Webhook};
use serde_json::json;
use tokio::task::JoinHandle;
use uuid::Uuid;

fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Load `.env_test` before any configuration static is touched
fn load_test_environment() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        init_test_tracing();
        if let Err(e) = dotenvy::from_filename(".env_test") {
            println!("Warning: Could not load .env_test file: {e}");
        }
    });
}

/// Webhook receiver running on an ephemeral local port
pub struct TestServer {
    server_handle: JoinHandle<()>,
    pub base_url: String,
    pub webhook: Webhook,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        load_test_environment();

        // Table creation is idempotent, so every server may run it
        identity_sync_axum::init().await?;

        let webhook = Webhook::from_env()?;
        let app = identity_sync_axum::identity_sync_router_no_trace(webhook.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            server_handle,
            base_url: format!("http://{addr}"),
            webhook,
            client: reqwest::Client::new(),
        })
    }

    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.base_url, identity_sync_axum::WEBHOOK_ROUTE_PATH.as_str())
    }

    /// Post a body signed with the configured secret, as svix would deliver it
    pub async fn post_signed(&self, body: &str) -> reqwest::Response {
        let msg_id = format!("msg_{}", Uuid::new_v4().simple());
        let timestamp = Utc::now().timestamp();
        let signature = self
            .webhook
            .sign(&msg_id, timestamp, body.as_bytes())
            .expect("Failed to sign test delivery");

        self.post_with_headers(
            body,
            &[
                (SVIX_ID_HEADER, msg_id.as_str()),
                (SVIX_TIMESTAMP_HEADER, timestamp.to_string().as_str()),
                (SVIX_SIGNATURE_HEADER, signature.as_str()),
            ],
        )
        .await
    }

    pub async fn post_with_headers(
        &self,
        body: &str,
        headers: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut request = self
            .client
            .post(self.webhook_url())
            .header("content-type", "application/json")
            .body(body.to_string());

        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        request.send().await.expect("Failed to reach test server")
    }

    pub async fn shutdown(self) {
        self.server_handle.abort();
    }
}

/// Make the store fail every insert of `clerk_id`, through a SQLite trigger
///
/// Runs against the test database directly, after the users table exists.
pub async fn reject_inserts_for(clerk_id: &str) {
    let url = std::env::var("GENERIC_DATA_STORE_URL").expect("GENERIC_DATA_STORE_URL is set");
    let table_name = std::env::var("DB_TABLE_USERS").unwrap_or_else(|_| {
        format!(
            "{}users",
            std::env::var("DB_TABLE_PREFIX").unwrap_or_default()
        )
    });

    let pool = sqlx::SqlitePool::connect(&url)
        .await
        .expect("Failed to open the SQLite test database");
    sqlx::query(&format!(
        r#"
        CREATE TRIGGER IF NOT EXISTS reject_{clerk_id}
        BEFORE INSERT ON {table_name}
        WHEN NEW.clerk_id = '{clerk_id}'
        BEGIN
            SELECT RAISE(ABORT, 'insert rejected for {clerk_id}');
        END
        "#
    ))
    .execute(&pool)
    .await
    .expect("Failed to install reject trigger");
    pool.close().await;
}

/// A clerk id no other test run uses
pub fn unique_clerk_id(label: &str) -> String {
    format!("user_{label}_{}", Uuid::new_v4().simple())
}

pub fn user_event(kind: &str, clerk_id: &str, email: &str, first: &str, last: &str) -> String {
    json!({
        "type": kind,
        "object": "event",
        "data": {
            "id": clerk_id,
            "email_addresses": [{"id": "idn_1", "email_address": email}],
            "first_name": first,
            "last_name": last,
            "image_url": format!("https://img.clerk.com/{clerk_id}.png")
        }
    })
    .to_string()
}
