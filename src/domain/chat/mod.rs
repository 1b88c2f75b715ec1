pub mod error;
pub mod language;
pub mod service;

pub use error::ChatServiceError;
pub use language::{LanguageDetection, LinguaLanguageDetector};
use serde::{Deserialize, Serialize};
pub use service::{ChatService, ChatServiceApi};

/// Request for POST /chat
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Stored name of a previously uploaded file
    #[serde(default)]
    pub file_id: Option<String>,
}

/// Response for POST /chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Set when the reply was generated but audio could not be produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
