pub mod error;
pub mod service;

pub use error::FileServiceError;
use serde::{Deserialize, Serialize};
pub use service::{FileService, FileServiceApi};

/// Response for POST /upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub message: String,
}
