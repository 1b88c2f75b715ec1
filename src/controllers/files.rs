use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::files::{
        service::{UploadedFile, NO_FILE_PART},
        FileService, FileServiceApi, UploadResponse,
    },
    error::{AppError, AppResult},
    infrastructure::storage::sanitize_filename,
};

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

pub struct FileController {
    file_service: Arc<FileService>,
}

impl FileController {
    pub fn new(file_service: Arc<FileService>) -> Self {
        Self { file_service }
    }

    /// POST /upload - Store a file for later use in chat
    pub async fn upload(
        State(controller): State<Arc<FileController>>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> AppResult<Json<UploadResponse>> {
        let mut multipart = multipart.map_err(|rejection| {
            tracing::warn!(error = %rejection.body_text(), "Upload is not multipart");
            AppError::BadRequest(NO_FILE_PART.to_string())
        })?;

        let mut uploaded = None;
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            // A plain form value under the same name is not a file
            let Some(filename) = field.file_name().map(str::to_string) else {
                continue;
            };
            let bytes = field.bytes().await.map_err(multipart_error)?;
            uploaded = Some(UploadedFile {
                filename,
                bytes: bytes.to_vec(),
            });
            break;
        }

        let response = controller.file_service.upload(uploaded).await?;
        Ok(Json(response))
    }

    /// GET /files/:filename - Download an uploaded file as an attachment
    pub async fn download_file(
        State(controller): State<Arc<FileController>>,
        Path(filename): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let bytes = controller.file_service.get_file(&filename).await?;
        let safe_name = sanitize_filename(&filename);
        let content_type = mime_guess::from_path(&safe_name).first_or_octet_stream();

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, header_value(content_type.as_ref())?);
        headers.insert(
            header::CONTENT_DISPOSITION,
            header_value(&format!("attachment; filename=\"{}\"", safe_name))?,
        );

        Ok((StatusCode::OK, headers, Body::from(bytes)))
    }

    /// GET /audio/:filename - Stream synthesized speech
    pub async fn serve_audio(
        State(controller): State<Arc<FileController>>,
        Path(filename): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let bytes = controller.file_service.get_audio(&filename).await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));

        Ok((StatusCode::OK, headers, Body::from(bytes)))
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    tracing::warn!(error = %err.body_text(), "Failed to read multipart body");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large".to_string())
    } else {
        AppError::BadRequest("Invalid multipart body".to_string())
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::Internal(format!("invalid header value: {}", e)))
}
