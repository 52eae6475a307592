//! identity_sync - Clerk user webhook ingestion and user table reconciliation
//!
//! This crate verifies svix-signed webhook deliveries from Clerk, decodes them
//! into typed user events, and keeps a local `users` table in sync with them.

mod config;
mod coordination;
mod storage;
mod userdb;
mod utils;
mod webhook;

#[cfg(test)]
mod test_utils;

pub use coordination::{CoordinationError, WebhookOutcome, handle_clerk_webhook_core};

pub use config::WEBHOOK_ROUTE_PATH;

pub use userdb::{User, UserError, UserProfile, UserStore};

pub use webhook::{
    ClerkDeletedObject, ClerkEmailAddress, ClerkUserData, ClerkWebhookEvent, SVIX_ID_HEADER,
    SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER, Webhook, WebhookError, WebhookHeaders,
};

/// Initialize the user store
///
/// Creates the users table when it does not exist yet and validates its schema.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    userdb::init().await?;
    Ok(())
}
