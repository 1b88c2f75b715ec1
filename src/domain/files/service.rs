use super::error::FileServiceError;
use super::UploadResponse;
use crate::infrastructure::storage::{is_allowed_type, StorageArea, StorageError, StorageManager};
use async_trait::async_trait;
use std::sync::Arc;

pub const NO_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const FILE_TYPE_NOT_ALLOWED: &str = "File type not allowed";
pub const FILE_NOT_FOUND: &str = "File not found";
pub const AUDIO_NOT_FOUND: &str = "Audio file not found";

/// An uploaded file as received by the HTTP layer
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct FileService {
    storage: Arc<StorageManager>,
}

impl FileService {
    pub fn new(storage: Arc<StorageManager>) -> Self {
        Self { storage }
    }
}

#[async_trait]
pub trait FileServiceApi: Send + Sync {
    /// Validate and store an upload, then sweep expired files
    async fn upload(&self, file: Option<UploadedFile>) -> Result<UploadResponse, FileServiceError>;

    /// Bytes of an uploaded file
    async fn get_file(&self, filename: &str) -> Result<Vec<u8>, FileServiceError>;

    /// Bytes of a synthesized audio file
    async fn get_audio(&self, filename: &str) -> Result<Vec<u8>, FileServiceError>;
}

#[async_trait]
impl FileServiceApi for FileService {
    async fn upload(&self, file: Option<UploadedFile>) -> Result<UploadResponse, FileServiceError> {
        let file = file.ok_or_else(|| FileServiceError::Invalid(NO_FILE_PART.to_string()))?;

        if file.filename.is_empty() {
            return Err(FileServiceError::Invalid(NO_SELECTED_FILE.to_string()));
        }
        if !is_allowed_type(&file.filename) {
            return Err(FileServiceError::Invalid(FILE_TYPE_NOT_ALLOWED.to_string()));
        }

        let stored = self
            .storage
            .store(StorageArea::Files, &file.bytes, &file.filename)
            .await?;

        tracing::info!(
            original_name = %stored.original_name,
            stored_name = %stored.stored_name,
            size_bytes = file.bytes.len(),
            "Upload stored"
        );

        self.storage.sweep().await;

        Ok(UploadResponse {
            success: true,
            filename: stored.stored_name,
            message: "File uploaded successfully".to_string(),
        })
    }

    async fn get_file(&self, filename: &str) -> Result<Vec<u8>, FileServiceError> {
        self.read(StorageArea::Files, filename, FILE_NOT_FOUND).await
    }

    async fn get_audio(&self, filename: &str) -> Result<Vec<u8>, FileServiceError> {
        self.read(StorageArea::Audio, filename, AUDIO_NOT_FOUND).await
    }
}

impl FileService {
    /// Any read failure is reported to the client as not found
    async fn read(
        &self,
        area: StorageArea,
        filename: &str,
        not_found: &str,
    ) -> Result<Vec<u8>, FileServiceError> {
        self.storage.read(area, filename).await.map_err(|e| {
            match &e {
                StorageError::NotFound(_) => {
                    tracing::warn!(area = %area, filename = filename, "Requested file does not exist")
                }
                _ => tracing::error!(error = %e, area = %area, filename = filename, "Error serving file"),
            }
            FileServiceError::NotFound(not_found.to_string())
        })
    }
}
