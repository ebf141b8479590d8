use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeederError>;

#[derive(Error, Debug)]
pub enum SeederError {
    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Token lifetime of {0} minutes is out of range")]
    InvalidTtl(i64),

    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}
