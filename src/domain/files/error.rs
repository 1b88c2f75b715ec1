use crate::error::AppError;
use crate::infrastructure::storage::StorageError;

pub const FILE_SAVE_FAILED: &str = "Error saving file";

#[derive(Debug, thiserror::Error)]
pub enum FileServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<FileServiceError> for AppError {
    fn from(err: FileServiceError) -> Self {
        match err {
            FileServiceError::Invalid(msg) => AppError::BadRequest(msg),
            FileServiceError::NotFound(msg) => AppError::NotFound(msg),
            FileServiceError::Storage(e) => AppError::Storage {
                public_message: FILE_SAVE_FAILED.to_string(),
                detail: e.to_string(),
            },
        }
    }
}
