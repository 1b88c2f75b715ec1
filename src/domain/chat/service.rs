use super::error::ChatServiceError;
use super::language::LanguageDetection;
use super::ChatResponse;
use crate::error::AUDIO_UNAVAILABLE_MESSAGE;
use crate::infrastructure::repositories::{GenerationRepository, TtsRepository};
use crate::infrastructure::storage::{StorageArea, StorageManager, StoredFile};
use async_trait::async_trait;
use std::sync::Arc;

pub const NO_MESSAGE_PROVIDED: &str = "No message provided";

pub struct ChatService {
    storage: Arc<StorageManager>,
    generation_repo: Arc<dyn GenerationRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    language_detector: Arc<dyn LanguageDetection>,
    fallback_language: String,
}

impl ChatService {
    pub fn new(
        storage: Arc<StorageManager>,
        generation_repo: Arc<dyn GenerationRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        language_detector: Arc<dyn LanguageDetection>,
        fallback_language: String,
    ) -> Self {
        Self {
            storage,
            generation_repo,
            tts_repo,
            language_detector,
            fallback_language,
        }
    }
}

#[async_trait]
pub trait ChatServiceApi: Send + Sync {
    /// Answer a user message
    ///
    /// This operation:
    /// - Validates the message is present
    /// - Prepends the referenced upload's text, if it can be read
    /// - Detects the language, falling back to the configured default
    /// - Generates the reply (the only step whose failure fails the request)
    /// - Synthesizes and stores the reply's audio, degrading to text only
    async fn handle_chat(
        &self,
        message: Option<String>,
        file_id: Option<String>,
    ) -> Result<ChatResponse, ChatServiceError>;
}

#[async_trait]
impl ChatServiceApi for ChatService {
    async fn handle_chat(
        &self,
        message: Option<String>,
        file_id: Option<String>,
    ) -> Result<ChatResponse, ChatServiceError> {
        // 1. Validate
        let message = message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ChatServiceError::Invalid(NO_MESSAGE_PROVIDED.to_string()))?;

        tracing::info!(
            message_length = message.len(),
            file_id = file_id.as_deref().unwrap_or(""),
            "Chat request"
        );

        // 2. Include file content (best effort)
        let prompt = match file_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => self.build_prompt_with_file(&message, id).await,
            None => message,
        };

        // 3. Detect language (best effort)
        let language = self.detect_language(&prompt).await;

        // 4. Generate reply (mandatory)
        let reply = self
            .generation_repo
            .generate(&prompt)
            .await
            .map_err(|detail| {
                tracing::error!(error = %detail, language = %language, "Generation failed");
                ChatServiceError::Generation {
                    language: language.clone(),
                    detail,
                }
            })?;

        // 5. Synthesize audio (best effort)
        match self.synthesize_audio(&reply, &language).await {
            Ok(stored) => {
                // 6. Enforce retention after the write
                self.storage.sweep().await;

                Ok(ChatResponse {
                    response: reply,
                    language,
                    audio_url: Some(format!("/audio/{}", stored.stored_name)),
                    error: None,
                })
            }
            Err(detail) => {
                tracing::error!(error = %detail, language = %language, "Text-to-speech failed");
                Ok(ChatResponse {
                    response: reply,
                    language,
                    audio_url: None,
                    error: Some(AUDIO_UNAVAILABLE_MESSAGE.to_string()),
                })
            }
        }
    }
}

impl ChatService {
    async fn build_prompt_with_file(&self, message: &str, file_id: &str) -> String {
        match self.storage.read_text(StorageArea::Files, file_id).await {
            Ok(content) => format!("File content:\n{}\n\nUser message: {}", content, message),
            Err(e) => {
                tracing::warn!(error = %e, file_id = file_id, "Could not include file in prompt");
                message.to_string()
            }
        }
    }

    /// Detection is CPU-bound, so it runs off the async workers
    async fn detect_language(&self, text: &str) -> String {
        let detector = self.language_detector.clone();
        let text = text.to_string();

        let detected = tokio::task::spawn_blocking(move || detector.detect(&text))
            .await
            .map_err(|e| e.to_string())
            .and_then(|result| result);

        match detected {
            Ok(language) => {
                tracing::info!(language = %language, "Language detected");
                language
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = %self.fallback_language,
                    "Language detection failed, using fallback language"
                );
                self.fallback_language.clone()
            }
        }
    }

    async fn synthesize_audio(&self, text: &str, language: &str) -> Result<StoredFile, String> {
        let audio = self.tts_repo.synthesize(text, language).await?;
        self.storage
            .store_audio(&audio)
            .await
            .map_err(|e| e.to_string())
    }
}
