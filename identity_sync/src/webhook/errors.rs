use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Missing CLERK_WEBHOOK_SECRET environment variable")]
    MissingSecret,

    #[error("Invalid webhook secret: {0}")]
    InvalidSecret(String),

    #[error("Missing svix headers")]
    MissingHeaders,

    #[error("Invalid svix-timestamp header")]
    InvalidTimestamp,

    #[error("Message timestamp too old")]
    TimestampTooOld,

    #[error("Message timestamp too new")]
    TimestampTooNew,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// Whether the error comes from server configuration rather than from the delivery
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingSecret | Self::InvalidSecret(_))
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert!(WebhookError::MissingSecret.is_configuration_error());
        assert!(WebhookError::InvalidSecret("bad base64".to_string()).is_configuration_error());

        assert!(!WebhookError::MissingHeaders.is_configuration_error());
        assert!(!WebhookError::InvalidSignature.is_configuration_error());
        assert!(!WebhookError::TimestampTooOld.is_configuration_error());
        assert!(!WebhookError::InvalidPayload("x".to_string()).is_configuration_error());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();

        match WebhookError::from(json_error) {
            WebhookError::InvalidPayload(msg) => assert!(msg.contains("expected")),
            other => panic!("Expected InvalidPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(WebhookError::MissingHeaders.to_string(), "Missing svix headers");
        assert_eq!(
            WebhookError::InvalidSignature.to_string(),
            "Invalid webhook signature"
        );
        assert_eq!(
            WebhookError::InvalidPayload("missing field `id`".to_string()).to_string(),
            "Invalid webhook payload: missing field `id`"
        );
    }
}
