use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Message returned to the client when the generation service fails
pub const GENERATION_FAILED_MESSAGE: &str =
    "Có lỗi xảy ra khi gọi API Gemini. Vui lòng thử lại sau.";

/// Message returned to the client when speech synthesis fails
pub const AUDIO_UNAVAILABLE_MESSAGE: &str = "Không thể tạo âm thanh";

/// Message returned to the client for unexpected failures
pub const GENERIC_FAILURE_MESSAGE: &str = "Có lỗi xảy ra. Vui lòng thử lại sau.";

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("External service error: {detail}")]
    ExternalService {
        public_message: String,
        detail: String,
        language: Option<String>,
    },

    #[error("Storage error: {detail}")]
    Storage {
        public_message: String,
        detail: String,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body: `{"error": ..., "language": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ExternalService { .. } | Self::Storage { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert to the client-facing body. Upstream and storage details stay in the logs.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::PayloadTooLarge(msg) => {
                ErrorResponse {
                    error: msg.clone(),
                    language: None,
                }
            }
            Self::ExternalService {
                public_message,
                language,
                ..
            } => ErrorResponse {
                error: public_message.clone(),
                language: language.clone(),
            },
            Self::Storage { public_message, .. } => ErrorResponse {
                error: public_message.clone(),
                language: None,
            },
            Self::Internal(_) => ErrorResponse {
                error: GENERIC_FAILURE_MESSAGE.to_string(),
                language: None,
            },
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
