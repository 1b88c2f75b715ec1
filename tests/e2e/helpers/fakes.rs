use ai_chat_backend::domain::chat::LanguageDetection;
use ai_chat_backend::infrastructure::repositories::{GenerationRepository, TtsRepository};
use async_trait::async_trait;
use parking_lot::Mutex;

/// Minimal MP3 frame header returned by the fake speech service
pub const FAKE_AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00];

/// In-process stand-ins for the generation, speech and detection services
pub struct Upstream {
    pub reply: Result<String, String>,
    pub tts_fails: bool,
    pub language: Option<String>,
    pub prompts: Mutex<Vec<String>>,
    pub tts_calls: Mutex<Vec<(String, String)>>,
}

impl Upstream {
    /// Generation answers "Hi there", speech works, detection says "en"
    pub fn healthy() -> Self {
        Self {
            reply: Ok("Hi there".to_string()),
            tts_fails: false,
            language: Some("en".to_string()),
            prompts: Mutex::new(Vec::new()),
            tts_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_generation_error(mut self, detail: &str) -> Self {
        self.reply = Err(detail.to_string());
        self
    }

    pub fn with_tts_error(mut self) -> Self {
        self.tts_fails = true;
        self
    }

    pub fn with_undetectable_language(mut self) -> Self {
        self.language = None;
        self
    }

    pub fn generation_calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl GenerationRepository for Upstream {
    async fn generate(&self, prompt: &str) -> Result<String, String> {
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone()
    }
}

#[async_trait]
impl TtsRepository for Upstream {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        self.tts_calls
            .lock()
            .push((text.to_string(), language.to_string()));
        if self.tts_fails {
            Err("speech service unreachable".to_string())
        } else {
            Ok(FAKE_AUDIO.to_vec())
        }
    }
}

impl LanguageDetection for Upstream {
    fn detect(&self, _text: &str) -> Result<String, String> {
        self.language
            .clone()
            .ok_or_else(|| "no features in text".to_string())
    }
}
