use http::HeaderMap;

use super::errors::CoordinationError;
use crate::userdb::{User, UserStore};
use crate::webhook::{ClerkWebhookEvent, Webhook, WebhookHeaders};

/// What a successfully handled delivery did
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// `user.created` was applied; the record may have existed already
    UserSynced(User),
    /// `user.updated` was applied
    UserUpdated(User),
    /// `user.deleted` was received; records are kept
    DeletionAcknowledged(Option<String>),
    /// An event type this service does not act on
    Ignored(String),
}

impl WebhookOutcome {
    /// Short text for the HTTP response body
    pub fn message(&self) -> String {
        match self {
            Self::UserSynced(user) => format!("User {} synced", user.clerk_id),
            Self::UserUpdated(user) => format!("User {} updated", user.clerk_id),
            Self::DeletionAcknowledged(Some(id)) => format!("Deletion of {id} acknowledged"),
            Self::DeletionAcknowledged(None) => "Deletion acknowledged".to_string(),
            Self::Ignored(kind) => format!("Event {kind} ignored"),
        }
    }
}

/// Verify, decode and apply one Clerk webhook delivery
///
/// Signature checks run on the raw body before anything is decoded, and the
/// store is only touched for `user.created` and `user.updated`.
#[tracing::instrument(skip_all, fields(msg_id))]
pub async fn handle_clerk_webhook_core(
    webhook: &Webhook,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookOutcome, CoordinationError> {
    let headers = WebhookHeaders::from_header_map(headers)?;
    tracing::Span::current().record("msg_id", headers.id.as_str());

    webhook.verify(body, &headers)?;

    let event = ClerkWebhookEvent::parse(body)?;
    tracing::debug!(kind = event.kind(), "Verified webhook event");

    let outcome = match event {
        ClerkWebhookEvent::UserCreated(data) => {
            let user = UserStore::sync_user(data.into_profile()?).await?;
            WebhookOutcome::UserSynced(user)
        }
        ClerkWebhookEvent::UserUpdated(data) => {
            let user = UserStore::update_user(data.into_profile()?).await?;
            WebhookOutcome::UserUpdated(user)
        }
        ClerkWebhookEvent::UserDeleted(deleted) => {
            tracing::info!(
                clerk_id = deleted.id.as_deref().unwrap_or_default(),
                "User deletion acknowledged, local record kept"
            );
            WebhookOutcome::DeletionAcknowledged(deleted.id)
        }
        ClerkWebhookEvent::Other(kind) => {
            tracing::info!(kind = %kind, "Ignoring unhandled webhook event");
            WebhookOutcome::Ignored(kind)
        }
    };

    Ok(outcome)
}
