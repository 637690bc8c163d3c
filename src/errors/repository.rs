use thiserror::Error;

use crate::utils::ShareCodeError;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Entity not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// Invalid input data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<ShareCodeError> for RepositoryError {
    fn from(err: ShareCodeError) -> Self {
        match err {
            // The store handed out an id the codec cannot represent
            ShareCodeError::NonPositiveId(_) | ShareCodeError::IdOutOfRange(_) => {
                Self::Conflict(err.to_string())
            }
            ShareCodeError::Malformed(_) | ShareCodeError::NotIssued(_) => {
                Self::InvalidData(err.to_string())
            }
        }
    }
}
