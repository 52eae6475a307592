//! Coordination between webhook verification and the user store
//!
//! - `errors`: error type shared by the coordination functions
//! - `webhook`: verification, decoding and dispatch of Clerk deliveries

mod errors;
mod webhook;

pub use errors::CoordinationError;
pub use webhook::{WebhookOutcome, handle_clerk_webhook_core};
