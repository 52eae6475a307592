use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::storage::validate_sqlite_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{User, UserProfile},
};

use super::config::DB_TABLE_USERS;

pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            sequence_number INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            clerk_id TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            image TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("sequence_number", "INTEGER"),
        ("id", "TEXT"),
        ("clerk_id", "TEXT"),
        ("email", "TEXT"),
        ("name", "TEXT"),
        ("image", "TEXT"),
        ("created_at", "TIMESTAMP"),
        ("updated_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_all_users_sqlite(pool: &Pool<Sqlite>) -> Result<Vec<User>, UserError> {
    // Tables may not exist yet for a fresh in-memory database
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} ORDER BY sequence_number ASC
        "#
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_clerk_id_sqlite(
    pool: &Pool<Sqlite>,
    clerk_id: &str,
) -> Result<Option<User>, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE clerk_id = ?
        "#
    ))
    .bind(clerk_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

/// Inserts the profile unless a row with the same clerk_id exists.
///
/// Returns the stored row and whether this call created it.
pub(super) async fn sync_user_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
    profile: &UserProfile,
) -> Result<(User, bool), UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();
    let now = Utc::now();

    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, clerk_id, email, name, image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (clerk_id) DO NOTHING
        "#
    ))
    .bind(id)
    .bind(&profile.clerk_id)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.image)
    .bind(now) // created_at
    .bind(now) // updated_at
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    let user = fetch_by_clerk_id(pool, &profile.clerk_id).await?;

    Ok((user, result.rows_affected() == 1))
}

/// Overwrites the mutable fields of the row with the same clerk_id, inserting it when absent.
pub(super) async fn update_user_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
    profile: &UserProfile,
) -> Result<User, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();
    let now = Utc::now();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, clerk_id, email, name, image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (clerk_id) DO UPDATE SET
            email = excluded.email,
            name = excluded.name,
            image = excluded.image,
            updated_at = excluded.updated_at
        "#
    ))
    .bind(id)
    .bind(&profile.clerk_id)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.image)
    .bind(now) // created_at, ignored on conflict
    .bind(now) // updated_at
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    fetch_by_clerk_id(pool, &profile.clerk_id).await
}

async fn fetch_by_clerk_id(pool: &Pool<Sqlite>, clerk_id: &str) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE clerk_id = ?
        "#
    ))
    .bind(clerk_id)
    .fetch_one(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}
