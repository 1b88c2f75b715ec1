use crate::error::{AppError, GENERATION_FAILED_MESSAGE};

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("generation failed ({language}): {detail}")]
    Generation { language: String, detail: String },
}

impl From<ChatServiceError> for AppError {
    fn from(err: ChatServiceError) -> Self {
        match err {
            ChatServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ChatServiceError::Generation { language, detail } => AppError::ExternalService {
                public_message: GENERATION_FAILED_MESSAGE.to_string(),
                detail,
                language: Some(language),
            },
        }
    }
}
