use std::{env, fmt, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use http::HeaderMap;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

pub const SVIX_ID_HEADER: &str = "svix-id";
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";
const DEFAULT_TOLERANCE_SECS: u64 = 5 * 60;

/// Verifier for svix-signed webhook deliveries
///
/// Built once from the endpoint signing secret and shared by every request.
#[derive(Clone)]
pub struct Webhook {
    key: Vec<u8>,
    tolerance: Duration,
}

impl fmt::Debug for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webhook")
            .field("key", &"[REDACTED]")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl Webhook {
    /// Create a verifier from a signing secret as shown in the Clerk dashboard
    ///
    /// The `whsec_` prefix is optional; the rest must be standard base64.
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        if encoded.is_empty() {
            return Err(WebhookError::InvalidSecret("secret is empty".to_string()));
        }

        let key = STANDARD
            .decode(encoded)
            .map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;

        Ok(Self {
            key,
            tolerance: Duration::from_secs(DEFAULT_TOLERANCE_SECS),
        })
    }

    /// Create a verifier from `CLERK_WEBHOOK_SECRET`
    ///
    /// `CLERK_WEBHOOK_TOLERANCE_SECS` optionally overrides the accepted clock skew.
    pub fn from_env() -> Result<Self, WebhookError> {
        let secret = env::var("CLERK_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(WebhookError::MissingSecret)?;

        let webhook = Self::new(secret.trim())?;

        match env::var("CLERK_WEBHOOK_TOLERANCE_SECS") {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(secs) => Ok(webhook.with_tolerance(Duration::from_secs(secs))),
                Err(_) => {
                    tracing::warn!(
                        value = %value,
                        default = DEFAULT_TOLERANCE_SECS,
                        "Ignoring invalid CLERK_WEBHOOK_TOLERANCE_SECS"
                    );
                    Ok(webhook)
                }
            },
            Err(_) => Ok(webhook),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Verify a delivery against the current time
    pub fn verify(&self, payload: &[u8], headers: &WebhookHeaders) -> Result<(), WebhookError> {
        self.verify_at(payload, headers, Utc::now().timestamp())
    }

    pub(crate) fn verify_at(
        &self,
        payload: &[u8],
        headers: &WebhookHeaders,
        now: i64,
    ) -> Result<(), WebhookError> {
        let timestamp: i64 = headers
            .timestamp
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;

        let tolerance = i64::try_from(self.tolerance.as_secs()).unwrap_or(i64::MAX);
        if now.saturating_sub(timestamp) > tolerance {
            return Err(WebhookError::TimestampTooOld);
        }
        if timestamp.saturating_sub(now) > tolerance {
            return Err(WebhookError::TimestampTooNew);
        }

        let expected = self.compute_signature(&headers.id, &headers.timestamp, payload)?;

        let matched = headers
            .signature
            .split(' ')
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, signature)| STANDARD.decode(signature).ok())
            .any(|provided| constant_time_compare(&expected, &provided));

        if matched {
            Ok(())
        } else {
            tracing::debug!(msg_id = %headers.id, "No svix signature matched");
            Err(WebhookError::InvalidSignature)
        }
    }

    /// Produce a `v1,<base64>` signature for a message, as svix would send it
    pub fn sign(
        &self,
        msg_id: &str,
        timestamp: i64,
        payload: &[u8],
    ) -> Result<String, WebhookError> {
        let signature = self.compute_signature(msg_id, &timestamp.to_string(), payload)?;
        Ok(format!("{SIGNATURE_VERSION},{}", STANDARD.encode(signature)))
    }

    fn compute_signature(
        &self,
        msg_id: &str,
        timestamp: &str,
        payload: &[u8],
    ) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// The three svix headers of a delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl WebhookHeaders {
    /// Extract the svix headers, failing when any of them is absent or empty
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, WebhookError> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        match (
            get(SVIX_ID_HEADER),
            get(SVIX_TIMESTAMP_HEADER),
            get(SVIX_SIGNATURE_HEADER),
        ) {
            (Some(id), Some(timestamp), Some(signature)) => Ok(Self {
                id,
                timestamp,
                signature,
            }),
            _ => Err(WebhookError::MissingHeaders),
        }
    }
}
