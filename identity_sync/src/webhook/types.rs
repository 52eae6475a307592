use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::errors::WebhookError;
use crate::userdb::UserProfile;

/// Raw envelope shared by every Clerk event
#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    kind: String,
    data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClerkEmailAddress {
    pub email_address: String,
}

/// The user object Clerk sends with `user.created` and `user.updated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClerkUserData {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Treats an explicit `null` list the same as an absent one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ClerkUserData {
    /// Normalize into the fields the user store keeps
    ///
    /// The first email address wins and a user without one gets an empty
    /// email. The name is `"{first} {last}"` with surrounding whitespace removed.
    pub fn into_profile(self) -> Result<UserProfile, WebhookError> {
        if self.id.trim().is_empty() {
            return Err(WebhookError::InvalidPayload(
                "user id must not be empty".to_string(),
            ));
        }

        let email = self
            .email_addresses
            .into_iter()
            .next()
            .map(|e| e.email_address)
            .unwrap_or_default();

        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string();

        Ok(UserProfile {
            clerk_id: self.id,
            email,
            name,
            image: self.image_url,
        })
    }
}

/// Payload of `user.deleted`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClerkDeletedObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A decoded Clerk event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClerkWebhookEvent {
    UserCreated(ClerkUserData),
    UserUpdated(ClerkUserData),
    UserDeleted(ClerkDeletedObject),
    /// Any event type this service does not act on
    Other(String),
}

impl ClerkWebhookEvent {
    /// Decode a verified request body
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        let envelope: EventEnvelope = serde_json::from_slice(body)?;

        if !envelope.data.is_object() {
            return Err(WebhookError::InvalidPayload(
                "`data` must be an object".to_string(),
            ));
        }

        let event = match envelope.kind.as_str() {
            "user.created" => Self::UserCreated(serde_json::from_value(envelope.data)?),
            "user.updated" => Self::UserUpdated(serde_json::from_value(envelope.data)?),
            "user.deleted" => Self::UserDeleted(serde_json::from_value(envelope.data)?),
            _ => Self::Other(envelope.kind),
        };

        Ok(event)
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::UserCreated(_) => "user.created",
            Self::UserUpdated(_) => "user.updated",
            Self::UserDeleted(_) => "user.deleted",
            Self::Other(kind) => kind,
        }
    }
}
