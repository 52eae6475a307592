//! Clerk webhook verification and decoding
//!
//! Clerk delivers events through svix: every delivery carries `svix-id`,
//! `svix-timestamp` and `svix-signature` headers, and the signature is an
//! HMAC-SHA256 over `"{id}.{timestamp}.{body}"` keyed by the endpoint secret.

mod errors;
mod types;
mod verify;

pub use errors::WebhookError;
pub use types::{ClerkDeletedObject, ClerkEmailAddress, ClerkUserData, ClerkWebhookEvent};
pub use verify::{
    SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER, Webhook, WebhookHeaders,
};
