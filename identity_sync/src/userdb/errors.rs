use thiserror::Error;

use crate::utils::UtilError;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<UtilError> for UserError {
    fn from(err: UtilError) -> Self {
        UserError::Storage(err.to_string())
    }
}
