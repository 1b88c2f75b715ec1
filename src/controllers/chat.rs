use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::chat::{ChatRequest, ChatResponse, ChatService, ChatServiceApi},
    error::{AppError, AppResult},
};

pub struct ChatController {
    chat_service: Arc<ChatService>,
}

impl ChatController {
    pub fn new(chat_service: Arc<ChatService>) -> Self {
        Self { chat_service }
    }

    /// POST /chat - Answer a message with text and synthesized speech
    pub async fn chat(
        State(controller): State<Arc<ChatController>>,
        payload: Result<Json<ChatRequest>, JsonRejection>,
    ) -> AppResult<Json<ChatResponse>> {
        let Json(request) = payload.map_err(|rejection| {
            tracing::warn!(error = %rejection.body_text(), "Malformed chat request");
            AppError::BadRequest("Invalid request body".to_string())
        })?;

        let response = controller
            .chat_service
            .handle_chat(request.message, request.file_id)
            .await?;

        Ok(Json(response))
    }
}
