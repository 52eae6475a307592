mod error;
mod router;
mod webhook;

pub use error::IntoResponseError;
pub use router::{identity_sync_router, identity_sync_router_no_trace};

// Re-export what a host application needs to wire the router
pub use identity_sync::{WEBHOOK_ROUTE_PATH, Webhook, WebhookError, init};
