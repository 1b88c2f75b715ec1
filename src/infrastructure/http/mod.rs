pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{chat::ChatController, files::FileController, health, index};
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::StorageManager;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router with all routes and layers
pub fn create_app(
    storage: Arc<StorageManager>,
    chat_controller: Arc<ChatController>,
    file_controller: Arc<FileController>,
    max_upload_bytes: usize,
) -> Router {
    // Chat
    let chat_routes = Router::new()
        .route("/chat", post(ChatController::chat))
        .with_state(chat_controller);

    // Upload and retrieval of stored files
    let file_routes = Router::new()
        .route("/upload", post(FileController::upload))
        .route("/files/:filename", get(FileController::download_file))
        .route("/audio/:filename", get(FileController::serve_audio))
        .with_state(file_controller);

    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(storage)
        .merge(chat_routes)
        .merge(file_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
