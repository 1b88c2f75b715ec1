use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ai_chat_backend::infrastructure::config::{Config, LogFormat};
use ai_chat_backend::infrastructure::http::{create_app, start_http_server};
use ai_chat_backend::infrastructure::storage::StorageManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting AI Chat Backend on {}:{}",
        config.host,
        config.port
    );
    if config.is_development() {
        tracing::info!("Running in development mode");
    }

    // Prepare managed storage directories
    let storage = Arc::new(StorageManager::new(config.storage_root.clone()));
    storage.ensure_dirs().await?;
    tracing::info!(root = %storage.root().display(), "Storage directories ready");

    // Shared HTTP client for upstream services
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()?;

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let generation_repo = Arc::new(ai_chat_backend::infrastructure::repositories::GeminiRepository::new(
        http_client.clone(),
        config.gemini_base_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    let tts_repo = Arc::new(ai_chat_backend::infrastructure::repositories::GoogleTtsRepository::new(
        http_client,
        config.tts_base_url.clone(),
    ));
    let language_detector = Arc::new(ai_chat_backend::domain::chat::LinguaLanguageDetector::new());

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let chat_service = Arc::new(ai_chat_backend::domain::chat::ChatService::new(
        storage.clone(),
        generation_repo,
        tts_repo,
        language_detector,
        config.fallback_language.clone(),
    ));
    let file_service = Arc::new(ai_chat_backend::domain::files::FileService::new(storage.clone()));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let chat_controller = Arc::new(ai_chat_backend::controllers::chat::ChatController::new(chat_service));
    let file_controller = Arc::new(ai_chat_backend::controllers::files::FileController::new(file_service));

    // Start HTTP server with all routes
    let app = create_app(storage, chat_controller, file_controller, config.max_upload_bytes);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "ai_chat_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "ai_chat_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
