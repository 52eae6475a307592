use http::StatusCode;
use identity_sync::{CoordinationError, UserError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Client mistakes map to 400, server-side configuration and storage failures to 500
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match &e {
                CoordinationError::Webhook(err) if err.is_configuration_error() => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                CoordinationError::Webhook(_) => StatusCode::BAD_REQUEST,
                CoordinationError::UserError(UserError::InvalidData(_)) => StatusCode::BAD_REQUEST,
                CoordinationError::UserError(UserError::Storage(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, e.to_string())
        })
    }
}
