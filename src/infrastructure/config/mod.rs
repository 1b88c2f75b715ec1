use std::env;
use std::path::PathBuf;

/// Directory under the OS temp dir that holds both managed storage areas
pub const DEFAULT_STORAGE_DIR_NAME: &str = "ai_chat_files";

/// 16 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    // Speech synthesis
    pub tts_base_url: String,
    pub fallback_language: String,
    pub upstream_timeout_secs: u64,
    // Storage
    pub storage_root: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Environment {
    /// Anything other than `production` runs as development
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or("GEMINI_API_KEY not found in environment variables")?;

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()?,
            environment: Environment::parse(
                &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            ),
            log_format: LogFormat::parse(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            gemini_api_key,
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-pro".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            tts_base_url: env::var("TTS_BASE_URL")
                .unwrap_or_else(|_| "https://translate.google.com".to_string()),
            fallback_language: env::var("FALLBACK_LANGUAGE").unwrap_or_else(|_| "vi".to_string()),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir().join(DEFAULT_STORAGE_DIR_NAME)),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .map(|v| v.parse::<usize>())
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
