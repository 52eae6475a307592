use thiserror::Error;

use crate::userdb::UserError;
use crate::webhook::WebhookError;

/// Errors that can occur while processing a webhook delivery
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// The delivery could not be verified or decoded
    #[error("Webhook error: {0}")]
    Webhook(WebhookError),

    /// Error from the user database operations
    #[error("User error: {0}")]
    UserError(UserError),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Webhook(err) if err.is_configuration_error() => {
                tracing::error!("Webhook error: {}", err)
            }
            Self::Webhook(err) => tracing::warn!("Rejected webhook delivery: {}", err),
            Self::UserError(err) => tracing::error!("User error: {}", err),
        }
        self
    }
}

// Conversions log on the way in so `?` call sites stay quiet

impl From<WebhookError> for CoordinationError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err).log()
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        Self::UserError(err).log()
    }
}
