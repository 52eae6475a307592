//! Shared test initialization
//!
//! Every test that touches the user store calls [`init_test_environment`]
//! first so the environment is loaded and the users table exists.

use std::sync::Once;

/// Load `.env_test` once per process and make sure the users table exists
///
/// ```rust,ignore
/// use crate::test_utils::init_test_environment;
///
/// #[tokio::test]
/// async fn my_test() {
///     init_test_environment().await;
///     // ... test code that requires database access
/// }
/// ```
pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        // Start every test process from an empty database file
        if let Some(db_path) = extract_sqlite_file_path() {
            let _ = std::fs::remove_file(&db_path);
        }
    });

    if let Err(e) = crate::userdb::UserStore::init().await {
        eprintln!("Warning: Failed to initialize UserStore: {e}");
    }
}

/// Make every insert of `clerk_id` into the users table fail
///
/// Installs a SQLite trigger, so store operations for that user return a storage error.
pub async fn reject_inserts_for(clerk_id: &str) {
    let store = crate::storage::GENERIC_DATA_STORE.lock().await;
    let pool = store
        .as_sqlite()
        .expect("Failure injection needs the SQLite test store");
    let table_name = crate::userdb::DB_TABLE_USERS.as_str();

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
    .execute(pool)
    .await
    .expect("Failed to install reject trigger");
}

/// Extract the file path from a SQLite database URL
///
/// Returns None for in-memory databases and non-SQLite URLs.
fn extract_sqlite_file_path_from_url(url: &str) -> Option<String> {
    let path = url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("file:").unwrap_or(path);
    let path = path.strip_prefix("//").unwrap_or(path);
    let path = path.split('?').next()?;

    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(path.to_string())
}

fn extract_sqlite_file_path() -> Option<String> {
    std::env::var("GENERIC_DATA_STORE_URL")
        .ok()
        .and_then(|url| extract_sqlite_file_path_from_url(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sqlite_file_path_from_url() {
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:/tmp/test.db"),
            Some("/tmp/test.db".to_string())
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:./test.db"),
            Some("./test.db".to_string())
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:///tmp/test.db"),
            Some("/tmp/test.db".to_string())
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:file:/tmp/test.db?mode=rwc"),
            Some("/tmp/test.db".to_string())
        );
        assert_eq!(extract_sqlite_file_path_from_url("sqlite::memory:"), None);
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:file::memory:?cache=shared"),
            None
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("postgresql://localhost/test"),
            None
        );
        assert_eq!(extract_sqlite_file_path_from_url(""), None);
    }
}
