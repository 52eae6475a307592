use crate::storage::GENERIC_DATA_STORE;
use crate::userdb::{
    errors::UserError,
    types::{User, UserProfile},
};
use crate::utils::gen_random_string;

use super::postgres::*;
use super::sqlite::*;

/// Access to the users table, keyed by Clerk user id
pub struct UserStore;

impl UserStore {
    /// Initialize the user database tables
    pub(crate) async fn init() -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_user_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    pub async fn get_all_users() -> Result<Vec<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_all_users_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            get_all_users_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by the id Clerk issued for them
    #[tracing::instrument(skip_all, fields(clerk_id = %clerk_id))]
    pub async fn get_user_by_clerk_id(clerk_id: &str) -> Result<Option<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            get_user_by_clerk_id_sqlite(pool, clerk_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_by_clerk_id_postgres(pool, clerk_id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(found) => tracing::debug!(found = found.is_some(), "User lookup completed"),
            Err(e) => tracing::error!(error = %e, "User lookup failed"),
        }

        result
    }

    /// Create the user if no record exists for its clerk_id
    ///
    /// An existing record is returned untouched, so repeated deliveries of the
    /// same creation event leave exactly one row behind.
    #[tracing::instrument(skip(profile), fields(clerk_id = %profile.clerk_id))]
    pub async fn sync_user(profile: UserProfile) -> Result<User, UserError> {
        validate_profile(&profile)?;
        let id = gen_random_string(24)?;
        let store = GENERIC_DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            sync_user_sqlite(pool, &id, &profile).await
        } else if let Some(pool) = store.as_postgres() {
            sync_user_postgres(pool, &id, &profile).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match result {
            Ok((user, created)) => {
                tracing::info!(
                    user_id = %user.id,
                    created,
                    sequence_number = user.sequence_number,
                    "User sync completed"
                );
                Ok(user)
            }
            Err(e) => {
                tracing::error!(error = %e, "User sync failed");
                Err(e)
            }
        }
    }

    /// Overwrite email, name and image of the user, creating the record when it is missing
    #[tracing::instrument(skip(profile), fields(clerk_id = %profile.clerk_id))]
    pub async fn update_user(profile: UserProfile) -> Result<User, UserError> {
        validate_profile(&profile)?;
        let id = gen_random_string(24)?;
        let store = GENERIC_DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            update_user_sqlite(pool, &id, &profile).await
        } else if let Some(pool) = store.as_postgres() {
            update_user_postgres(pool, &id, &profile).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(user) => tracing::info!(
                user_id = %user.id,
                inserted = (user.id == id),
                "User update completed"
            ),
            Err(e) => tracing::error!(error = %e, "User update failed"),
        }

        result
    }
}

fn validate_profile(profile: &UserProfile) -> Result<(), UserError> {
    if profile.clerk_id.trim().is_empty() {
        return Err(UserError::InvalidData(
            "clerk_id must not be empty".to_string(),
        ));
    }
    Ok(())
}
