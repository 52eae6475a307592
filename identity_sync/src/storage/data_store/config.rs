//! Data store connection configuration

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").expect("GENERIC_DATA_STORE_TYPE must be set")
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").expect("GENERIC_DATA_STORE_URL must be set")
});

/// Process-wide handle to the configured database pool
///
/// Pools are created lazily, so building the handle never blocks on the network.
pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type = GENERIC_DATA_STORE_TYPE.as_str();

    tracing::info!(store_type, "Initializing data store");

    let store = store_from(store_type, GENERIC_DATA_STORE_URL.as_str())
        .unwrap_or_else(|e| panic!("{e}"));

    Mutex::new(store)
});

/// Build the lazily connecting store for a `GENERIC_DATA_STORE_TYPE`/`_URL` pair
fn store_from(store_type: &str, store_url: &str) -> Result<Box<dyn DataStore>, String> {
    match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .map_err(|e| format!("Failed to parse SQLite connection string: {e}"))?
                .create_if_missing(true);

            Ok(Box::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
            }))
        }
        "postgres" => {
            let pool = sqlx::PgPool::connect_lazy(store_url)
                .map_err(|e| format!("Failed to create Postgres pool: {e}"))?;

            Ok(Box::new(PostgresDataStore { pool }))
        }
        t => Err(format!(
            "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
        )),
    }
}

/// Table prefix from environment variable
///
/// Empty by default, so the users table is simply `users`.
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| table_prefix_from(env::var("DB_TABLE_PREFIX").ok()));

fn table_prefix_from(value: Option<String>) -> String {
    value.unwrap_or_default()
}
