use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::storage::validate_postgres_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{User, UserProfile},
};

use super::config::DB_TABLE_USERS;

pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            sequence_number BIGSERIAL PRIMARY KEY,
            id TEXT NOT NULL UNIQUE,
            clerk_id TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            image TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("sequence_number", "bigint"),
        ("id", "text"),
        ("clerk_id", "text"),
        ("email", "text"),
        ("name", "text"),
        ("image", "text"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_all_users_postgres(pool: &Pool<Postgres>) -> Result<Vec<User>, UserError> {
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

pub(super) async fn get_user_by_clerk_id_postgres(
    pool: &Pool<Postgres>,
    clerk_id: &str,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE clerk_id = $1
        "#
    ))
    .bind(clerk_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

/// Inserts the profile unless a row with the same clerk_id exists.
///
/// `RETURNING` yields no row when the insert was skipped, in which case the
/// existing row is read back.
pub(super) async fn sync_user_postgres(
    pool: &Pool<Postgres>,
    id: &str,
    profile: &UserProfile,
) -> Result<(User, bool), UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let now = Utc::now();

    let inserted = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO {table_name} (id, clerk_id, email, name, image, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (clerk_id) DO NOTHING
        RETURNING *
        "#
    ))
    .bind(id)
    .bind(&profile.clerk_id)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.image)
    .bind(now) // created_at
    .bind(now) // updated_at
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    match inserted {
        Some(user) => Ok((user, true)),
        None => get_user_by_clerk_id_postgres(pool, &profile.clerk_id)
            .await?
            .map(|user| (user, false))
            .ok_or_else(|| {
                UserError::Storage(format!(
                    "User {} vanished after conflicting insert",
                    profile.clerk_id
                ))
            }),
    }
}

/// Overwrites the mutable fields of the row with the same clerk_id, inserting it when absent.
pub(super) async fn update_user_postgres(
    pool: &Pool<Postgres>,
    id: &str,
    profile: &UserProfile,
) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let now = Utc::now();

    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO {table_name} (id, clerk_id, email, name, image, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (clerk_id) DO UPDATE SET
            email = EXCLUDED.email,
            name = EXCLUDED.name,
            image = EXCLUDED.image,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#
    ))
    .bind(id)
    .bind(&profile.clerk_id)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.image)
    .bind(now) // created_at, ignored on conflict
    .bind(now) // updated_at
    .fetch_one(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}
