use sqlx::{Pool, Postgres, Row, Sqlite};

/// Validates that a PostgreSQL table schema matches what we expect
pub(crate) async fn validate_postgres_table_schema<E>(
    pool: &Pool<Postgres>,
    table_name: &str,
    expected_columns: &[(&str, &str)],
    error_mapper: impl Fn(String) -> E,
) -> Result<(), E> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1)",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await
    .map_err(|e| error_mapper(e.to_string()))?;

    if !table_exists {
        return Err(error_mapper(format!(
            "Schema validation failed: Table '{table_name}' does not exist"
        )));
    }

    let rows = sqlx::query(
        "SELECT column_name, data_type FROM information_schema.columns
         WHERE table_name = $1 ORDER BY column_name",
    )
    .bind(table_name)
    .fetch_all(pool)
    .await
    .map_err(|e| error_mapper(e.to_string()))?;

    let actual_columns: Vec<(String, String)> = rows
        .iter()
        .map(|row| {
            let name: String = row.get("column_name");
            let type_: String = row.get("data_type");
            (name, type_)
        })
        .collect();

    compare_columns(table_name, expected_columns, &actual_columns).map_err(error_mapper)
}

/// Validates that a SQLite table schema matches what we expect
pub(crate) async fn validate_sqlite_table_schema<E>(
    pool: &Pool<Sqlite>,
    table_name: &str,
    expected_columns: &[(&str, &str)],
    error_mapper: impl Fn(String) -> E,
) -> Result<(), E> {
    let table_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table_name)
            .fetch_one(pool)
            .await
            .map_err(|e| error_mapper(e.to_string()))?;

    if table_count == 0 {
        return Err(error_mapper(format!(
            "Schema validation failed: Table '{table_name}' does not exist"
        )));
    }

    // PRAGMA arguments cannot be bound, the name comes from configuration
    let rows = sqlx::query(&format!("PRAGMA table_info({table_name})"))
        .fetch_all(pool)
        .await
        .map_err(|e| error_mapper(e.to_string()))?;

    let actual_columns: Vec<(String, String)> = rows
        .iter()
        .map(|row| {
            let name: String = row.get("name");
            let type_: String = row.get("type");
            (name, type_)
        })
        .collect();

    compare_columns(table_name, expected_columns, &actual_columns).map_err(error_mapper)
}

fn compare_columns(
    table_name: &str,
    expected_columns: &[(&str, &str)],
    actual_columns: &[(String, String)],
) -> Result<(), String> {
    for (expected_name, expected_type) in expected_columns {
        let found = actual_columns
            .iter()
            .find(|(name, _)| name == expected_name);

        match found {
            Some((_, actual_type)) if actual_type.eq_ignore_ascii_case(expected_type) => {}
            Some((_, actual_type)) => {
                return Err(format!(
                    "Schema validation failed: Column '{expected_name}' has type '{actual_type}' but expected '{expected_type}'"
                ));
            }
            None => {
                return Err(format!(
                    "Schema validation failed: Missing column '{expected_name}'"
                ));
            }
        }
    }

    for (actual_name, _) in actual_columns {
        if !expected_columns
            .iter()
            .any(|(name, _)| *name == actual_name)
        {
            tracing::warn!(
                "Extra column '{}' found in table '{}'",
                actual_name,
                table_name
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn columns(cols: &[(&str, &str)]) -> Vec<(String, String)> {
        cols.iter()
            .map(|(n, t)| (n.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn test_compare_columns_match() {
        let expected = [("id", "TEXT"), ("created_at", "TIMESTAMP")];
        let actual = columns(&[("id", "text"), ("created_at", "TIMESTAMP")]);
        assert!(compare_columns("users", &expected, &actual).is_ok());
    }

    #[test]
    fn test_compare_columns_extra_column_is_allowed() {
        let expected = [("id", "TEXT")];
        let actual = columns(&[("id", "TEXT"), ("nickname", "TEXT")]);
        assert!(compare_columns("users", &expected, &actual).is_ok());
    }

    #[test]
    fn test_compare_columns_missing_column() {
        let expected = [("id", "TEXT"), ("clerk_id", "TEXT")];
        let actual = columns(&[("id", "TEXT")]);
        let err = compare_columns("users", &expected, &actual).unwrap_err();
        assert!(err.contains("Missing column 'clerk_id'"));
    }

    #[test]
    fn test_compare_columns_wrong_type() {
        let expected = [("sequence_number", "INTEGER")];
        let actual = columns(&[("sequence_number", "TEXT")]);
        let err = compare_columns("users", &expected, &actual).unwrap_err();
        assert!(err.contains("has type 'TEXT' but expected 'INTEGER'"));
    }

    #[tokio::test]
    async fn test_validate_sqlite_table_schema() {
        let opts = sqlx::sqlite::SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("in-memory url should parse");
        // A single connection keeps the in-memory database alive for the whole test
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .expect("in-memory pool should connect");

        sqlx::query("CREATE TABLE accounts (id TEXT NOT NULL, balance INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .expect("table creation should succeed");

        let ok = validate_sqlite_table_schema(
            &pool,
            "accounts",
            &[("id", "TEXT"), ("balance", "INTEGER")],
            |e| e,
        )
        .await;
        assert!(ok.is_ok());

        let missing_table =
            validate_sqlite_table_schema(&pool, "ledger", &[("id", "TEXT")], |e| e).await;
        assert!(
            missing_table
                .unwrap_err()
                .contains("Table 'ledger' does not exist")
        );

        let wrong_type =
            validate_sqlite_table_schema(&pool, "accounts", &[("balance", "TEXT")], |e| e).await;
        assert!(wrong_type.is_err());
    }
}
