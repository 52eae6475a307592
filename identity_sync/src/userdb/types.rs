use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user record mirrored from the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Database-assigned sequence number (primary key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    /// Locally generated identifier, fixed once the record exists
    pub id: String,
    /// Identifier issued by Clerk, unique across the table
    pub clerk_id: String,
    /// Primary email address, empty when the provider sent none
    pub email: String,
    /// Display name built from first and last name
    pub name: String,
    /// Avatar URL
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The provider-owned fields of a user, as carried by a webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub clerk_id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
}

impl UserProfile {
    pub fn new(
        clerk_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            clerk_id: clerk_id.into(),
            email: email.into(),
            name: name.into(),
            image,
        }
    }
}
